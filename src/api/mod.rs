// ==========================================
// 自发货运费核算系统 - API 层
// ==========================================
// 职责: 会话门面，供命令行/界面调用
// ==========================================

pub mod capability;
pub mod error;
pub mod report_api;

pub use capability::{AllowAll, Capability, CapabilityGate, StaticGate};
pub use error::{ApiError, ApiResult};
pub use report_api::{RateLoadSummary, ReportApi, ReportInfo, UploadOutcome, UploadTicket};
