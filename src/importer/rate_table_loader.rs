// ==========================================
// 自发货运费核算系统 - 运费表加载
// ==========================================
// 来源列: State, Rate_per_kg
// 空州名、非数值/非正费率的行直接跳过，不上报
// ==========================================

use crate::domain::RateTable;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::TabularParser;
use crate::importer::importer_trait::RateSource;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

pub const STATE_COLUMN: &str = "State";
pub const RATE_COLUMN: &str = "Rate_per_kg";

/// 从 CSV 文本构建运费表
pub fn parse_rate_csv(text: &str) -> ImportResult<RateTable> {
    let records = TabularParser.parse_text(text)?;
    let mut table = RateTable::new();
    let mut skipped = 0usize;

    for (idx, row) in records.iter().enumerate() {
        let state = row.get(STATE_COLUMN).map(|s| s.trim()).unwrap_or("");
        let rate = row
            .get(RATE_COLUMN)
            .and_then(|r| r.trim().parse::<f64>().ok());

        match rate {
            Some(rate) if table.insert(state, rate) => {}
            _ => {
                skipped += 1;
                debug!(row = idx + 2, state, "跳过无效运费行");
            }
        }
    }

    info!(states = table.len(), skipped, "运费表加载完成");
    Ok(table)
}

// ==========================================
// FileRateSource - 从 CSV 文件加载
// ==========================================
pub struct FileRateSource {
    path: PathBuf,
}

impl FileRateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RateSource for FileRateSource {
    async fn load(&self) -> ImportResult<RateTable> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Err(ImportError::FileNotFound(self.path.display().to_string()));
        }

        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ImportError::RateSourceError(format!("{}: {}", self.path.display(), e)))?;

        parse_rate_csv(&text)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ==========================================
// StaticRateSource - 内存运费表
// ==========================================
pub struct StaticRateSource {
    table: RateTable,
}

impl StaticRateSource {
    pub fn new(table: RateTable) -> Self {
        Self { table }
    }
}

#[async_trait]
impl RateSource for StaticRateSource {
    async fn load(&self) -> ImportResult<RateTable> {
        Ok(self.table.clone())
    }

    fn describe(&self) -> String {
        format!("内存运费表 ({} 个州)", self.table.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_rate_csv_skips_invalid_rows() {
        let text = "State,Rate_per_kg\n\
                    Karnataka,55\n\
                    ,40\n\
                    Goa,abc\n\
                    Kerala,-5\n\
                    tamil nadu , 45.5 \n";
        let table = parse_rate_csv(text).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("KARNATAKA"), Some(55.0));
        assert_eq!(table.lookup("TAMIL NADU"), Some(45.5));
        assert_eq!(table.lookup("GOA"), None);
    }

    #[test]
    fn test_parse_rate_csv_without_expected_columns() {
        let table = parse_rate_csv("Region,Price\nSouth,10\n").unwrap();
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_file_rate_source() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "State,Rate_per_kg").unwrap();
        writeln!(temp_file, "Maharashtra,65").unwrap();

        let source = FileRateSource::new(temp_file.path());
        let table = source.load().await.unwrap();
        assert_eq!(table.lookup("MAHARASHTRA"), Some(65.0));
    }

    #[tokio::test]
    async fn test_file_rate_source_missing_file() {
        let source = FileRateSource::new("non_existent_rates.csv");
        assert!(matches!(
            source.load().await,
            Err(ImportError::FileNotFound(_))
        ));
    }
}
