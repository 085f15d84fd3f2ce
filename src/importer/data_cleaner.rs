// ==========================================
// 自发货运费核算系统 - 数据清洗器
// ==========================================
// 职责: TRIM / NULL 标准化 / 数值容错解析
// ==========================================

pub struct DataCleaner;

impl DataCleaner {
    pub fn clean_text(&self, value: &str, uppercase: bool) -> String {
        let trimmed = value.trim();
        if uppercase {
            trimmed.to_uppercase()
        } else {
            trimmed.to_string()
        }
    }

    /// 标准化 NULL 值（空字符串/空白 → None）
    pub fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 解析数量
    ///
    /// 取字段开头的整数部分（"3 units" → 3）；
    /// 解析失败、为 0 或为负时返回 1
    pub fn parse_quantity(&self, value: Option<&str>) -> u32 {
        value
            .and_then(|v| leading_integer(v.trim()))
            .filter(|q| *q > 0)
            .and_then(|q| u32::try_from(q).ok())
            .unwrap_or(1)
    }

    /// 解析金额；失败或非有限值返回 0
    pub fn parse_decimal(&self, value: Option<&str>) -> f64 {
        value
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
