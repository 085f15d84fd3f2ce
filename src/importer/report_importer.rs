// ==========================================
// 自发货运费核算系统 - 订单报表导入器
// ==========================================
// 流程: 格式识别 → TXT 转换 → 表格解析 → 字段映射
// 红线: 解析失败不产出任何行
// ==========================================

use crate::domain::{RawRow, ReportFormat};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::ReportParser;
use crate::importer::format_normalizer::FormatNormalizer;
use crate::importer::importer_trait::RecordMapper;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// 已解析的订单报表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedReport {
    pub file_name: String,
    pub format: ReportFormat,
    /// 是否经过 TXT → CSV 转换
    pub converted: bool,
    pub rows: Vec<RawRow>,
}

pub struct OrderReportImporter<M: RecordMapper = FieldMapper> {
    parser: ReportParser,
    mapper: M,
}

impl OrderReportImporter<FieldMapper> {
    /// # 参数
    /// - min_columns: TXT 报表表头最少列数
    pub fn new(min_columns: usize) -> Self {
        Self::with_mapper(min_columns, FieldMapper::default())
    }
}

impl<M: RecordMapper> OrderReportImporter<M> {
    pub fn with_mapper(min_columns: usize, mapper: M) -> Self {
        Self {
            parser: ReportParser::new(FormatNormalizer::new(min_columns)),
            mapper,
        }
    }

    /// 解析已读入内存的报表
    pub fn import_text(
        &self,
        file_name: &str,
        text: &str,
        format: ReportFormat,
    ) -> ImportResult<ParsedReport> {
        let records = self.parser.parse_text(text, format)?;
        let rows = self.mapper.map_all(&records);

        info!(file = file_name, format = %format, rows = rows.len(), "订单报表解析完成");

        Ok(ParsedReport {
            file_name: file_name.to_string(),
            format,
            converted: format.needs_conversion(),
            rows,
        })
    }

    /// 异步读取并解析报表文件
    pub async fn import_file(&self, file_path: &Path) -> ImportResult<ParsedReport> {
        let format = ReportParser::detect_format(file_path)?;

        if !tokio::fs::try_exists(file_path).await.unwrap_or(false) {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let bytes = tokio::fs::read(file_path).await?;
        let text = String::from_utf8_lossy(&bytes);
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.display().to_string());

        self.import_text(&file_name, &text, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    const CSV: &str = "amazon-order-id,product-name,quantity,ship-state,order-status\n\
                       A1,Widget - Pack of 2,1,Karnataka,Shipped\n";

    #[test]
    fn test_import_text_csv() {
        let report = OrderReportImporter::new(5)
            .import_text("orders.csv", CSV, ReportFormat::Csv)
            .unwrap();
        assert!(!report.converted);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].order_id.as_deref(), Some("A1"));
    }

    #[tokio::test]
    async fn test_import_txt_file() {
        let mut temp_file = Builder::new().suffix(".txt").tempfile().unwrap();
        write!(temp_file, "{}", CSV.replace(',', "\t")).unwrap();

        let report = OrderReportImporter::new(5)
            .import_file(temp_file.path())
            .await
            .unwrap();
        assert!(report.converted);
        assert_eq!(report.format, ReportFormat::TabDelimited);
        assert_eq!(report.rows[0].product_name.as_deref(), Some("Widget - Pack of 2"));
    }

    #[tokio::test]
    async fn test_import_unsupported_extension() {
        let temp_file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        let result = OrderReportImporter::new(5).import_file(temp_file.path()).await;
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }
}
