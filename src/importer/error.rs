// ==========================================
// 自发货运费核算系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .txt/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    // ===== 报表结构错误 =====
    /// TXT 报表为空或列数不足
    #[error("TXT 报表格式错误: {0}")]
    FormatError(String),

    /// 表格结构不一致（列数不符等）
    #[error("CSV 解析失败 (行 {line}): {message}")]
    ParseError { line: usize, message: String },

    // ===== 运费表错误 =====
    #[error("运费表加载失败: {0}")]
    RateSourceError(String),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        let line = err
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(0);
        ImportError::ParseError {
            line,
            message: err.to_string(),
        }
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
