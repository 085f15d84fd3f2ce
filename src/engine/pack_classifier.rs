// ==========================================
// 自发货运费核算系统 - 包装规格识别
// ==========================================
// 规则（顺序执行，命中即返回）:
// 1) 产品名含 "pack of 2"（不区分大小写）→ PackOfTwo
// 2) 产品名含 "pack of 1"（不区分大小写）→ PackOfOne
// 3) 其他 → DefaultToOne: PackOfOne / Strict: Unclassified
// ==========================================

use crate::domain::{PackPolicy, PackVariant};
use once_cell::sync::Lazy;
use regex::Regex;

static PACK_OF_TWO: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)pack of 2").expect("valid regex"));
static PACK_OF_ONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)pack of 1").expect("valid regex"));

// 去掉规格后残留的首尾连字符或空括号（只处理第一个命中）
static LEFTOVER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*-\s*$|^\s*-\s*|\s*\(\s*\)\s*$").expect("valid regex"));

#[derive(Debug, Clone, Copy, Default)]
pub struct PackClassifier {
    policy: PackPolicy,
}

impl PackClassifier {
    pub fn new(policy: PackPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> PackPolicy {
        self.policy
    }

    pub fn classify(&self, product_name: &str) -> PackVariant {
        if PACK_OF_TWO.is_match(product_name) {
            PackVariant::PackOfTwo
        } else if PACK_OF_ONE.is_match(product_name) {
            PackVariant::PackOfOne
        } else {
            match self.policy {
                PackPolicy::DefaultToOne => PackVariant::PackOfOne,
                PackPolicy::Strict => PackVariant::Unclassified,
            }
        }
    }

    /// 识别规格并提取基础产品名
    ///
    /// 基础产品名 = 删除命中的规格标记（全部出现处）→ TRIM → 清理残留连字符/空括号 → TRIM
    pub fn split(&self, product_name: &str) -> (PackVariant, String) {
        let stripped = if PACK_OF_TWO.is_match(product_name) {
            PACK_OF_TWO.replace_all(product_name, "")
        } else {
            PACK_OF_ONE.replace_all(product_name, "")
        };

        let base = LEFTOVER.replace(stripped.trim(), "").trim().to_string();
        (self.classify(product_name), base)
    }
}
