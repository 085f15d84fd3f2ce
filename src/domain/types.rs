// ==========================================
// 自发货运费核算系统 - 领域类型定义
// ==========================================
// 职责: 包装规格、分类策略、排序策略、报表格式
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 包装规格 (Pack Variant)
// ==========================================
// 由产品名中的 "pack of N" 推断
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackVariant {
    PackOfOne,    // 单件装
    PackOfTwo,    // 两件装
    Unclassified, // 未识别（仅 strict 策略下出现）
}

impl PackVariant {
    /// 每单位计入 (单件装数, 两件装数)
    pub fn unit_counts(self) -> (u64, u64) {
        match self {
            PackVariant::PackOfOne => (1, 0),
            PackVariant::PackOfTwo => (0, 1),
            PackVariant::Unclassified => (0, 0),
        }
    }
}

impl fmt::Display for PackVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackVariant::PackOfOne => write!(f, "Pack of One"),
            PackVariant::PackOfTwo => write!(f, "Pack of Two"),
            PackVariant::Unclassified => write!(f, "Unclassified"),
        }
    }
}

// ==========================================
// 包装分类策略 (Pack Policy)
// ==========================================
// 产品名不含 "pack of N" 时的处理口径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackPolicy {
    #[default]
    DefaultToOne, // 视为单件装
    Strict,       // 两个桶都不计
}

impl fmt::Display for PackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackPolicy::DefaultToOne => write!(f, "default_to_one"),
            PackPolicy::Strict => write!(f, "strict"),
        }
    }
}

// ==========================================
// 产品销量排序策略 (Sales Sort Policy)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesSortPolicy {
    #[default]
    ByRevenue, // 按净销售额降序
    ByUnits,   // 按单件装+两件装数量降序
}

impl fmt::Display for SalesSortPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SalesSortPolicy::ByRevenue => write!(f, "by_revenue"),
            SalesSortPolicy::ByUnits => write!(f, "by_units"),
        }
    }
}

// ==========================================
// 报表格式 (Report Format)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportFormat {
    Csv,          // 原生 CSV
    TabDelimited, // 制表符分隔的 TXT 报表（需先转换）
}

impl ReportFormat {
    /// 按扩展名识别格式（不区分大小写）
    ///
    /// # 返回
    /// - Some(format): txt / csv
    /// - None: 其他扩展名
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(ReportFormat::Csv),
            "txt" => Some(ReportFormat::TabDelimited),
            _ => None,
        }
    }

    pub fn needs_conversion(self) -> bool {
        matches!(self, ReportFormat::TabDelimited)
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Csv => write!(f, "CSV"),
            ReportFormat::TabDelimited => write!(f, "TXT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_counts() {
        assert_eq!(PackVariant::PackOfOne.unit_counts(), (1, 0));
        assert_eq!(PackVariant::PackOfTwo.unit_counts(), (0, 1));
        assert_eq!(PackVariant::Unclassified.unit_counts(), (0, 0));
    }

    #[test]
    fn test_report_format_from_extension() {
        assert_eq!(ReportFormat::from_extension("TXT"), Some(ReportFormat::TabDelimited));
        assert_eq!(ReportFormat::from_extension("csv"), Some(ReportFormat::Csv));
        assert_eq!(ReportFormat::from_extension("xlsx"), None);
    }

    #[test]
    fn test_policy_serde_names() {
        let policy: PackPolicy = serde_json::from_str("\"strict\"").unwrap();
        assert_eq!(policy, PackPolicy::Strict);
        let sort: SalesSortPolicy = serde_json::from_str("\"by_units\"").unwrap();
        assert_eq!(sort, SalesSortPolicy::ByUnits);
        assert_eq!(PackPolicy::default(), PackPolicy::DefaultToOne);
    }
}
