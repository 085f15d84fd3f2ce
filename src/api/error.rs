// ==========================================
// 自发货运费核算系统 - API层错误类型
// ==========================================
// 职责: 汇总各层错误为面向用户的错误消息
// 所有错误仅作用于触发它的单次操作，不影响已有结果
// ==========================================

use crate::api::capability::Capability;
use crate::engine::ProcessingError;
use crate::export::ExportError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 导入错误
    // ==========================================
    #[error("报表导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("请先上传订单报表（TXT 或 CSV）")]
    NoOrderData,

    #[error("运费表尚未加载完成，请稍候")]
    RatesNotLoaded,

    // ==========================================
    // 核算错误
    // ==========================================
    #[error("核算失败: {0}")]
    Processing(#[from] ProcessingError),

    // ==========================================
    // 导出错误
    // ==========================================
    #[error("暂无可导出的核算结果")]
    ExportEmpty,

    #[error("导出失败: {0}")]
    Export(#[from] ExportError),

    // ==========================================
    // 权限
    // ==========================================
    #[error("功能未开放: {0}")]
    FeatureLocked(Capability),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
