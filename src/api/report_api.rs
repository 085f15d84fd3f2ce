// ==========================================
// 自发货运费核算系统 - 报表核算API
// ==========================================
// 职责: 会话级门面（上传 → 加载运费表 → 核算 → 导出）
// 红线:
// - 任一操作失败均保留此前的报表与核算结果
// - 每次上传分配递增的代次号，过期代次的解析结果直接丢弃
// ==========================================

use crate::api::capability::{AllowAll, Capability, CapabilityGate};
use crate::api::error::{ApiError, ApiResult};
use crate::config::AppConfig;
use crate::domain::{RateTable, RawRow, ReportFormat, RunResult};
use crate::engine::ReportOrchestrator;
use crate::export::{product_sales_csv, shipping_results_csv};
use crate::importer::{ImportResult, OrderReportImporter, ParsedReport, RateSource};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

/// 上传凭证（代次号）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket {
    generation: u64,
}

impl UploadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// 当前报表信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportInfo {
    pub generation: u64,
    pub file_name: String,
    pub format: ReportFormat,
    pub converted: bool,
    pub row_count: usize,
}

/// 上传结果
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// 已替换当前报表
    Applied(ReportInfo),
    /// 期间有更新的上传，本次结果已丢弃
    Superseded { generation: u64, latest: u64 },
}

/// 运费表加载结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLoadSummary {
    pub states: usize,
    /// 来源不可用，已回落为空表（全部订单使用默认费率）
    pub fell_back: bool,
}

#[derive(Default)]
struct SessionState {
    report: Option<ReportInfo>,
    rows: Vec<RawRow>,
    rates: RateTable,
    rates_loaded: bool,
    last_result: Option<RunResult>,
}

/// 报表核算API
pub struct ReportApi {
    config: AppConfig,
    importer: OrderReportImporter,
    orchestrator: ReportOrchestrator,
    gate: Arc<dyn CapabilityGate>,
    generation: AtomicU64,
    state: Mutex<SessionState>,
}

impl ReportApi {
    /// 创建新的ReportApi实例（全部功能放行）
    pub fn new(config: AppConfig) -> Self {
        Self::with_gate(config, Arc::new(AllowAll))
    }

    pub fn with_gate(config: AppConfig, gate: Arc<dyn CapabilityGate>) -> Self {
        Self {
            importer: OrderReportImporter::new(config.min_report_columns),
            orchestrator: ReportOrchestrator::from_config(&config),
            config,
            gate,
            generation: AtomicU64::new(0),
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // ==========================================
    // 上传
    // ==========================================

    /// 开始一次上传，分配新的代次号
    pub fn begin_upload(&self) -> ApiResult<UploadTicket> {
        self.require(Capability::Upload)?;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(UploadTicket { generation })
    }

    /// 提交解析结果
    ///
    /// # 返回
    /// - Ok(Applied): 已替换当前报表并清空上一次核算结果
    /// - Ok(Superseded): 凭证已过期，解析结果（含错误）被丢弃
    /// - Err(ApiError::Import): 解析失败，当前报表保持不变
    pub fn commit_upload(
        &self,
        ticket: UploadTicket,
        parsed: ImportResult<ParsedReport>,
    ) -> ApiResult<UploadOutcome> {
        let mut state = self.lock_state()?;

        // 在锁内比较代次，保证与其他提交互斥
        let latest = self.generation.load(Ordering::SeqCst);
        if ticket.generation != latest {
            warn!(generation = ticket.generation, latest, "丢弃过期的上传结果");
            return Ok(UploadOutcome::Superseded {
                generation: ticket.generation,
                latest,
            });
        }

        let report = parsed?;
        let info = ReportInfo {
            generation: ticket.generation,
            file_name: report.file_name,
            format: report.format,
            converted: report.converted,
            row_count: report.rows.len(),
        };

        state.rows = report.rows;
        state.report = Some(info.clone());
        state.last_result = None;

        info!(file = %info.file_name, rows = info.row_count, generation = info.generation, "订单报表已替换");
        Ok(UploadOutcome::Applied(info))
    }

    /// 读取并上传订单报表文件（.txt / .csv）
    pub async fn upload_order_file<P: AsRef<Path>>(&self, file_path: P) -> ApiResult<UploadOutcome> {
        let ticket = self.begin_upload()?;
        let parsed = self.importer.import_file(file_path.as_ref()).await;
        self.commit_upload(ticket, parsed)
    }

    /// 上传已读入内存的报表
    pub fn upload_order_text(
        &self,
        file_name: &str,
        text: &str,
        format: ReportFormat,
    ) -> ApiResult<UploadOutcome> {
        let ticket = self.begin_upload()?;
        let parsed = self.importer.import_text(file_name, text, format);
        self.commit_upload(ticket, parsed)
    }

    pub fn report_info(&self) -> ApiResult<Option<ReportInfo>> {
        Ok(self.lock_state()?.report.clone())
    }

    // ==========================================
    // 运费表
    // ==========================================

    /// 加载运费表；来源失败不阻断，回落为空表
    pub async fn load_rates(&self, source: &dyn RateSource) -> ApiResult<RateLoadSummary> {
        let (table, fell_back) = match source.load().await {
            Ok(table) => (table, false),
            Err(e) => {
                warn!(source = %source.describe(), error = %e, "运费表加载失败，全部使用默认费率");
                (RateTable::new(), true)
            }
        };

        let summary = RateLoadSummary {
            states: table.len(),
            fell_back,
        };
        self.set_rates(table)?;
        Ok(summary)
    }

    pub fn set_rates(&self, table: RateTable) -> ApiResult<()> {
        let mut state = self.lock_state()?;
        state.rates = table;
        state.rates_loaded = true;
        Ok(())
    }

    pub fn rate_table(&self) -> ApiResult<RateTable> {
        Ok(self.lock_state()?.rates.clone())
    }

    // ==========================================
    // 核算
    // ==========================================

    /// 对当前报表执行核算
    ///
    /// 失败时保留上一次核算结果
    pub fn process(&self) -> ApiResult<RunResult> {
        self.require(Capability::Process)?;

        let (rows, rates, generation) = {
            let state = self.lock_state()?;
            if state.rows.is_empty() {
                return Err(ApiError::NoOrderData);
            }
            if !state.rates_loaded {
                return Err(ApiError::RatesNotLoaded);
            }
            let generation = state.report.as_ref().map(|r| r.generation);
            (state.rows.clone(), state.rates.clone(), generation)
        };

        let result = match self.orchestrator.run(&rows, &rates) {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "核算失败，保留上一次结果");
                return Err(e.into());
            }
        };

        let mut state = self.lock_state()?;
        if state.report.as_ref().map(|r| r.generation) == generation {
            state.last_result = Some(result.clone());
        } else {
            // 核算期间报表已被替换，结果不再对应当前报表
            warn!(run_id = %result.run_id, "报表已更新，本次核算结果不保存");
        }
        Ok(result)
    }

    pub fn latest_result(&self) -> ApiResult<Option<RunResult>> {
        Ok(self.lock_state()?.last_result.clone())
    }

    // ==========================================
    // 导出
    // ==========================================

    pub fn export_shipping_csv(&self) -> ApiResult<String> {
        self.require(Capability::Export)?;
        let result = self.latest_result()?.ok_or(ApiError::ExportEmpty)?;
        if result.orders.is_empty() {
            return Err(ApiError::ExportEmpty);
        }
        Ok(shipping_results_csv(&result.orders)?)
    }

    pub fn export_sales_csv(&self) -> ApiResult<String> {
        self.require(Capability::Export)?;
        let result = self.latest_result()?.ok_or(ApiError::ExportEmpty)?;
        if result.products.is_empty() {
            return Err(ApiError::ExportEmpty);
        }
        Ok(product_sales_csv(&result.products)?)
    }

    // ==========================================
    // 内部
    // ==========================================

    fn require(&self, capability: Capability) -> ApiResult<()> {
        if self.gate.allows(capability) {
            Ok(())
        } else {
            Err(ApiError::FeatureLocked(capability))
        }
    }

    fn lock_state(&self) -> ApiResult<MutexGuard<'_, SessionState>> {
        self.state
            .lock()
            .map_err(|e| ApiError::InternalError(format!("锁获取失败: {}", e)))
    }
}
