// ==========================================
// 自发货运费核算系统 - 领域模型层
// ==========================================
// 职责: 定义报表行、订单/产品汇总、运费表、核算结果
// 红线: 不含解析逻辑,不含汇总逻辑
// ==========================================

pub mod order;
pub mod product;
pub mod rate;
pub mod run;
pub mod types;

// 重导出核心类型
pub use order::{LineItem, OrderAggregate, RawRow};
pub use product::{ProductAggregate, SalesSummary};
pub use rate::{normalize_state, RateTable, ResolvedRate, DEFAULT_RATE_PER_KG};
pub use run::RunResult;
pub use types::{PackPolicy, PackVariant, ReportFormat, SalesSortPolicy};
