// ==========================================
// 自发货运费核算系统 - 配置管理器
// ==========================================
// 职责: 配置加载、校验
// 解析顺序: 显式路径 → 环境变量 → 用户配置目录 → 内置默认值
// ==========================================

use crate::domain::{PackPolicy, SalesSortPolicy, DEFAULT_RATE_PER_KG};
use crate::importer::MIN_REPORT_COLUMNS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// 配置文件路径环境变量
pub const CONFIG_ENV_VAR: &str = "SELF_SHIP_CALC_CONFIG";

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("配置值无效 (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

// ==========================================
// AppConfig - 系统配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 收货州不在运费表中时的每公斤费率
    pub default_rate_per_kg: f64,
    pub pack_of_one_weight_kg: f64,
    pub pack_of_two_weight_kg: f64,
    /// TXT 报表表头最少列数
    pub min_report_columns: usize,
    pub pack_policy: PackPolicy,
    pub sales_sort: SalesSortPolicy,
    /// 运费表 CSV（State, Rate_per_kg）
    pub rate_table_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_rate_per_kg: DEFAULT_RATE_PER_KG,
            pack_of_one_weight_kg: 0.5,
            pack_of_two_weight_kg: 1.0,
            min_report_columns: MIN_REPORT_COLUMNS,
            pack_policy: PackPolicy::default(),
            sales_sort: SalesSortPolicy::default(),
            rate_table_path: None,
        }
    }
}

impl AppConfig {
    /// 校验配置值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.default_rate_per_kg.is_finite() || self.default_rate_per_kg <= 0.0 {
            return Err(invalid(
                "default_rate_per_kg",
                self.default_rate_per_kg,
                "必须为正数",
            ));
        }
        for (key, value) in [
            ("pack_of_one_weight_kg", self.pack_of_one_weight_kg),
            ("pack_of_two_weight_kg", self.pack_of_two_weight_kg),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(key, value, "必须为非负数"));
            }
        }
        if self.min_report_columns == 0 {
            return Err(invalid("min_report_columns", 0, "至少为 1"));
        }
        Ok(())
    }
}

fn invalid(key: &str, value: impl ToString, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager;

impl ConfigManager {
    /// 加载配置
    ///
    /// # 参数
    /// - explicit_path: 命令行指定的配置文件（优先级最高）
    ///
    /// # 返回
    /// - Ok(AppConfig): 已校验的配置
    /// - Err(ConfigError): 文件不可读、JSON 格式错误或取值非法
    pub fn load(explicit_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let path = explicit_path
            .map(Path::to_path_buf)
            .or_else(Self::env_config_path)
            .or_else(|| Self::default_config_path().filter(|p| p.exists()));

        let config = match path {
            Some(path) => Self::from_file(&path)?,
            None => {
                info!("未找到配置文件，使用内置默认配置");
                AppConfig::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件读取配置（缺省字段取默认值）
    pub fn from_file(path: &Path) -> Result<AppConfig, ConfigError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: display.clone(),
            message: e.to_string(),
        })?;

        let config: AppConfig =
            serde_json::from_str(&text).map_err(|e| ConfigError::ParseError {
                path: display.clone(),
                message: e.to_string(),
            })?;

        info!(path = %path.display(), "配置文件加载完成");
        Ok(config)
    }

    fn env_config_path() -> Option<PathBuf> {
        std::env::var(CONFIG_ENV_VAR)
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    /// 用户配置目录下的默认配置文件路径
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("self-ship-calc").join("config.json"))
    }
}
