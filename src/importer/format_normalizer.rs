// ==========================================
// 自发货运费核算系统 - TXT 报表格式转换
// ==========================================
// 职责: 制表符分隔文本 → 带引号转义的 CSV 文本
// 纯文本变换，无副作用
// ==========================================

use crate::importer::error::{ImportError, ImportResult};

/// 订单报表表头的最少列数（低于此值视为非订单报表）
pub const MIN_REPORT_COLUMNS: usize = 5;

/// 制表符分隔报表转换器
#[derive(Debug, Clone, Copy)]
pub struct FormatNormalizer {
    min_columns: usize,
}

impl Default for FormatNormalizer {
    fn default() -> Self {
        Self::new(MIN_REPORT_COLUMNS)
    }
}

impl FormatNormalizer {
    pub fn new(min_columns: usize) -> Self {
        Self { min_columns }
    }

    /// 将制表符分隔文本转换为 CSV 文本
    ///
    /// # 规则
    /// 1. 按 '\n' 拆行，丢弃空白行
    /// 2. 首行字段数 < min_columns → FormatError
    /// 3. 每个字段 TRIM；含逗号/引号/换行时加引号并将内部引号加倍
    /// 4. 字段以逗号连接，行以 '\n' 连接
    pub fn normalize(&self, text: &str) -> ImportResult<String> {
        let lines: Vec<&str> = text.split('\n').filter(|l| !l.trim().is_empty()).collect();

        let header = lines
            .first()
            .ok_or_else(|| ImportError::FormatError("TXT 文件为空".to_string()))?;

        let header_columns = header.split('\t').count();
        if header_columns < self.min_columns {
            return Err(ImportError::FormatError(format!(
                "表头仅有 {} 列（至少需要 {} 列），不像是订单报表",
                header_columns, self.min_columns
            )));
        }

        let converted: Vec<String> = lines
            .iter()
            .map(|line| {
                line.split('\t')
                    .map(quote_field)
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect();

        Ok(converted.join("\n"))
    }
}

/// CSV 字段转义
fn quote_field(raw: &str) -> String {
    let field = raw.trim();
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "amazon-order-id\tproduct-name\tquantity\tship-state\torder-status";

    #[test]
    fn test_normalize_plain_fields() {
        let text = format!("{}\nA1\tWidget\t1\tKarnataka\tShipped\n", HEADER);
        let csv = FormatNormalizer::default().normalize(&text).unwrap();
        assert_eq!(
            csv,
            "amazon-order-id,product-name,quantity,ship-state,order-status\n\
             A1,Widget,1,Karnataka,Shipped"
        );
    }

    #[test]
    fn test_normalize_quotes_commas_and_quotes() {
        let text = format!("{}\nA1\tWidget, Blue \"XL\"\t1\tKA\tShipped", HEADER);
        let csv = FormatNormalizer::default().normalize(&text).unwrap();
        let second = csv.lines().nth(1).unwrap();
        assert_eq!(second, "A1,\"Widget, Blue \"\"XL\"\"\",1,KA,Shipped");
    }

    #[test]
    fn test_normalize_skips_blank_lines_and_trims_cr() {
        let text = format!("{}\r\n\r\n   \nA1\tWidget\t1\tKA\tShipped\r\n", HEADER);
        let csv = FormatNormalizer::default().normalize(&text).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.ends_with("Shipped"));
    }

    #[test]
    fn test_normalize_empty_input() {
        let err = FormatNormalizer::default().normalize(" \n\n").unwrap_err();
        assert!(matches!(err, ImportError::FormatError(_)));
    }

    #[test]
    fn test_normalize_too_few_columns() {
        let err = FormatNormalizer::default()
            .normalize("a\tb\tc\td\n1\t2\t3\t4")
            .unwrap_err();
        assert!(matches!(err, ImportError::FormatError(_)));
    }

    #[test]
    fn test_custom_column_floor() {
        let csv = FormatNormalizer::new(2).normalize("a\tb\n1\t2").unwrap();
        assert_eq!(csv, "a,b\n1,2");
    }
}
