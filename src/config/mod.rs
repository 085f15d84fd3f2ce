// ==========================================
// 自发货运费核算系统 - 配置层
// ==========================================
// 职责: 系统配置加载与校验
// 存储: JSON 配置文件
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{AppConfig, ConfigError, ConfigManager, CONFIG_ENV_VAR};
