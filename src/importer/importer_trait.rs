// ==========================================
// 自发货运费核算系统 - 导入 Trait
// ==========================================
// 职责: 定义导入接口（不包含实现）
// ==========================================

use crate::domain::{RateTable, RawRow};
use crate::importer::error::ImportResult;
use crate::importer::file_parser::RawRecord;
use async_trait::async_trait;

// ==========================================
// RecordMapper Trait
// ==========================================
// 用途: 字段映射接口
// 实现者: FieldMapper
pub trait RecordMapper: Send + Sync {
    /// 将原始行记录映射为 RawRow
    ///
    /// 映射不会失败：缺失或无法解析的字段回落到默认值
    fn map_to_raw_row(&self, row: &RawRecord) -> RawRow;

    fn map_all(&self, rows: &[RawRecord]) -> Vec<RawRow> {
        rows.iter().map(|r| self.map_to_raw_row(r)).collect()
    }
}

// ==========================================
// RateSource Trait
// ==========================================
// 用途: 外部运费表来源（文件、内存等）
// 实现者: FileRateSource, StaticRateSource
#[async_trait]
pub trait RateSource: Send + Sync {
    /// 加载运费表
    ///
    /// # 返回
    /// - Ok(RateTable): 已过滤非法行的运费表
    /// - Err: 来源不可用；调用方应回落为空表
    async fn load(&self) -> ImportResult<RateTable>;

    /// 来源描述（用于日志）
    fn describe(&self) -> String;
}
