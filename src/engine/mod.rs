// ==========================================
// 自发货运费核算系统 - 引擎层
// ==========================================
// 职责: 规格识别、订单运费汇总、产品销量汇总
// 红线: 纯函数汇总，不持有跨次核算的可变状态
// ==========================================

pub mod error;
pub mod orchestrator;
pub mod order_aggregator;
pub mod pack_classifier;
pub mod sales_aggregator;

// 重导出核心引擎
pub use error::{ProcessingError, ProcessingResult};
pub use orchestrator::ReportOrchestrator;
pub use order_aggregator::{OrderAggregator, PackWeights};
pub use pack_classifier::PackClassifier;
pub use sales_aggregator::SalesAggregator;
