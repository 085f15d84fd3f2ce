// ==========================================
// 自发货运费核算系统 - 导入层
// ==========================================
// 职责: 外部报表/运费表导入,生成 RawRow 与 RateTable
// 支持: CSV, 制表符分隔 TXT
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod format_normalizer;
pub mod importer_trait;
pub mod rate_table_loader;
pub mod report_importer;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{RawRecord, ReportParser, TabularParser};
pub use format_normalizer::{FormatNormalizer, MIN_REPORT_COLUMNS};
pub use rate_table_loader::{parse_rate_csv, FileRateSource, StaticRateSource};
pub use report_importer::{OrderReportImporter, ParsedReport};

// 重导出 Trait 接口
pub use importer_trait::{RateSource, RecordMapper};
