// ==========================================
// 自发货运费核算系统 - 核心库
// ==========================================
// 输入: 卖家订单报表（TXT/CSV）+ 州运费表
// 输出: 订单运费明细 + 按规格拆分的产品销量
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 报表/运费表解析
pub mod importer;

// 引擎层 - 汇总规则
pub mod engine;

// 导出层 - CSV
pub mod export;

// 配置层 - 系统配置
pub mod config;

// API 层 - 会话门面
pub mod api;

// 命令行参数
pub mod cli;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    LineItem, OrderAggregate, PackPolicy, PackVariant, ProductAggregate, RateTable, RawRow,
    ReportFormat, RunResult, SalesSortPolicy, SalesSummary, DEFAULT_RATE_PER_KG,
};

pub use engine::{OrderAggregator, ProcessingError, ReportOrchestrator, SalesAggregator};

pub use importer::{FormatNormalizer, ImportError, OrderReportImporter, TabularParser};

pub use api::{ApiError, ReportApi};

pub use config::{AppConfig, ConfigManager};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "自发货运费核算系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
