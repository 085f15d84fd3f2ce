// ==========================================
// 自发货运费核算系统 - 引擎错误类型
// ==========================================
// 任一汇总阶段失败即中止本次核算，调用方保留上一次结果
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessingError {
    #[error("默认费率无效: {0}（必须为正的有限数）")]
    InvalidDefaultRate(f64),

    #[error("计算结果非有限数: {context}")]
    NonFiniteValue { context: String },

    #[error("数量累计溢出: {context}")]
    CountOverflow { context: String },

    #[error("核算过程异常中止: {0}")]
    Panicked(String),
}

pub type ProcessingResult<T> = Result<T, ProcessingError>;
