// ==========================================
// 自发货运费核算系统 - 报表解析器
// ==========================================
// 阶段 0: 格式识别 → (TXT 转换) → 表格解析
// 支持: CSV (.csv) / 制表符分隔 TXT (.txt)
// ==========================================

use crate::domain::ReportFormat;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::format_normalizer::FormatNormalizer;
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// 原始行记录: 列名 → 值（列名取自首行原文）
pub type RawRecord = HashMap<String, String>;

// ==========================================
// TabularParser - 带表头的 CSV 文本解析
// ==========================================
// 要么整体成功，要么返回首个结构错误且不产出任何行
#[derive(Debug, Clone, Copy, Default)]
pub struct TabularParser;

impl TabularParser {
    pub fn parse_text(&self, text: &str) -> ImportResult<Vec<RawRecord>> {
        let body = strip_leading_blank_lines(text.trim_start_matches('\u{feff}'));

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 列数由下方统一校验
            .from_reader(body.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;

            // 跳过完全空白的行
            if record.iter().all(|v| v.trim().is_empty()) {
                continue;
            }

            if record.len() != headers.len() {
                let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
                let message = if record.len() < headers.len() {
                    format!("字段过少: 期望 {} 列，实际 {} 列", headers.len(), record.len())
                } else {
                    format!("字段过多: 期望 {} 列，实际 {} 列", headers.len(), record.len())
                };
                return Err(ImportError::ParseError { line, message });
            }

            let row_map: RawRecord = headers
                .iter()
                .cloned()
                .zip(record.iter().map(|v| v.to_string()))
                .collect();
            records.push(row_map);
        }

        debug!(rows = records.len(), columns = headers.len(), "表格解析完成");
        Ok(records)
    }
}

fn strip_leading_blank_lines(text: &str) -> &str {
    let mut rest = text;
    while let Some(pos) = rest.find('\n') {
        if rest[..pos].trim().is_empty() {
            rest = &rest[pos + 1..];
        } else {
            break;
        }
    }
    rest
}

// ==========================================
// ReportParser - 订单报表解析（根据格式自动选择）
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportParser {
    normalizer: FormatNormalizer,
    tabular: TabularParser,
}

impl ReportParser {
    pub fn new(normalizer: FormatNormalizer) -> Self {
        Self {
            normalizer,
            tabular: TabularParser,
        }
    }

    /// 根据扩展名识别报表格式
    pub fn detect_format<P: AsRef<Path>>(file_path: P) -> ImportResult<ReportFormat> {
        let ext = file_path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        ReportFormat::from_extension(&ext).ok_or(ImportError::UnsupportedFormat(ext))
    }

    /// 解析报表文本
    ///
    /// # 参数
    /// - text: 文件全文
    /// - format: 报表格式；TXT 先经 FormatNormalizer 转换
    pub fn parse_text(&self, text: &str, format: ReportFormat) -> ImportResult<Vec<RawRecord>> {
        match format {
            ReportFormat::Csv => self.tabular.parse_text(text),
            ReportFormat::TabDelimited => {
                let csv_text = self.normalizer.normalize(text)?;
                self.tabular.parse_text(&csv_text)
            }
        }
    }
}
