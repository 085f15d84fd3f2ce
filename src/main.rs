// ==========================================
// 自发货运费核算系统 - 命令行主入口
// ==========================================

use anyhow::{bail, Context, Result};
use clap::Parser;
use self_ship_calc::api::{ApiError, ReportApi, UploadOutcome};
use self_ship_calc::cli::CliArgs;
use self_ship_calc::config::ConfigManager;
use self_ship_calc::export::{SALES_FILE_NAME, SHIPPING_FILE_NAME};
use self_ship_calc::importer::{FileRateSource, RateSource, StaticRateSource};
use self_ship_calc::{logging, RateTable, RunResult};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// 运费表预览的州
const PREVIEW_STATES: [&str; 3] = ["KARNATAKA", "TAMIL NADU", "MAHARASHTRA"];

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    // 初始化日志系统
    logging::init(args.log_json);
    info!("{} v{}", self_ship_calc::APP_NAME, self_ship_calc::VERSION);

    let config = args.apply_overrides(ConfigManager::load(args.config.as_deref())?);
    let api = ReportApi::new(config.clone());

    let rate_source: Box<dyn RateSource> = match &config.rate_table_path {
        Some(path) => Box::new(FileRateSource::new(path)),
        None => {
            warn!("未指定运费表，全部订单使用默认费率");
            Box::new(StaticRateSource::new(RateTable::new()))
        }
    };

    // 运费表与订单报表并行读取
    let (rates, upload) = futures::join!(
        api.load_rates(rate_source.as_ref()),
        api.upload_order_file(&args.orders)
    );
    let rates = rates?;

    let report = match upload.with_context(|| format!("无法导入 {}", args.orders.display()))? {
        UploadOutcome::Applied(info) => info,
        UploadOutcome::Superseded { generation, latest } => {
            bail!("上传被更新的请求取代 (generation={generation}, latest={latest})")
        }
    };

    info!(
        file = %report.file_name,
        format = %report.format,
        converted = report.converted,
        rows = report.row_count,
        states = rates.states,
        "数据准备完成"
    );

    let result = api.process()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let table = api.rate_table()?;
        print_summary(&result, &table, api.config().default_rate_per_kg);
    }

    if let Some(path) = &args.shipping_out {
        export(&output_path(path, SHIPPING_FILE_NAME), api.export_shipping_csv())?;
    }
    if let Some(path) = &args.sales_out {
        export(&output_path(path, SALES_FILE_NAME), api.export_sales_csv())?;
    }

    Ok(())
}

// 输出路径为目录时使用默认文件名
fn output_path(path: &Path, default_name: &str) -> PathBuf {
    if path.is_dir() {
        path.join(default_name)
    } else {
        path.to_path_buf()
    }
}

fn export(path: &Path, content: Result<String, ApiError>) -> Result<()> {
    match content {
        Ok(text) => {
            std::fs::write(path, text)
                .with_context(|| format!("无法写入 {}", path.display()))?;
            info!(path = %path.display(), "导出完成");
            Ok(())
        }
        Err(ApiError::ExportEmpty) => {
            warn!(path = %path.display(), "没有可导出的数据，跳过");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_summary(result: &RunResult, rates: &RateTable, default_rate: f64) {
    let preview: Vec<String> = rates
        .preview(&PREVIEW_STATES, default_rate)
        .into_iter()
        .map(|(state, rate)| format!("{}: {}", state, rate))
        .collect();
    println!("运费表: {} 个州 ({})", rates.len(), preview.join(" • "));
    println!();

    println!(
        "{:>5}  {:<22} {:<18} {:>10} {:>8} {:>8} {:>10}",
        "S.No.", "Order ID", "State", "Weight", "Rounded", "Rate", "Cost"
    );
    for (idx, order) in result.orders.iter().enumerate() {
        println!(
            "{:>5}  {:<22} {:<18} {:>10.2} {:>8} {:>8} {:>10}{}",
            idx + 1,
            order.order_id,
            order.state,
            order.total_weight_kg,
            order.rounded_weight_kg,
            order.rate_per_kg,
            order.shipping_cost,
            if order.rate_was_defaulted { "  ⚠" } else { "" }
        );
    }
    println!();

    println!("已发货订单: {}", result.orders.len());
    println!("运费合计: {}", result.total_shipping_cost());
    match result.average_shipping_cost() {
        Some(avg) => println!("单均运费: {}", avg),
        None => println!("单均运费: -"),
    }
    let defaulted = result.defaulted_order_count();
    if defaulted > 0 {
        println!("⚠ {} 个订单的收货州不在运费表中，已按默认费率 {} 计算", defaulted, default_rate);
    }
    println!();

    println!(
        "{:>5}  {:<40} {:>8} {:>8} {:>8} {:>12}",
        "S.No.", "Product", "Pack×1", "Pack×2", "Units", "Sales"
    );
    for (idx, product) in result.products.iter().enumerate() {
        println!(
            "{:>5}  {:<40} {:>8} {:>8} {:>8} {:>12.2}",
            idx + 1,
            product.base_name,
            product.pack_of_one_sold,
            product.pack_of_two_sold,
            product.total_units(),
            product.total_sales
        );
    }
    println!();
    println!(
        "单件装合计: {}  两件装合计: {}  运费收入: {}",
        result.total_pack_of_one_sold(),
        result.total_pack_of_two_sold(),
        result.total_shipping_revenue
    );
}
