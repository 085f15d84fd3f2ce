// ==========================================
// ReportApi 集成测试
// ==========================================
// 覆盖: 上传 / 运费表加载 / 核算 / 导出 / 功能开关 / 过期上传
// ==========================================


use self_ship_calc::api::{
    ApiError, Capability, RateLoadSummary, ReportApi, StaticGate, UploadOutcome,
};
use self_ship_calc::domain::ReportFormat;
use self_ship_calc::importer::{FileRateSource, ImportError, OrderReportImporter, StaticRateSource};
use self_ship_calc::AppConfig;
use std::sync::Arc;
use test_helpers::{csv_report, rate_csv, rate_table, txt_report, write_temp_file};

fn sample_txt() -> String {
    txt_report(&[
        "A1\tWidget - Pack of 2\t1\tKarnataka\tShipped\t200\t0\t40",
        "A1\tWidget - Pack of 1\t2\tKarnataka\tShipped\t300\t0\t0",
        "B2\tLamp - Pack of 1\t1\tGoa\tPending\t150\t0\t20",
    ])
}

fn ready_api() -> ReportApi {
    let api = ReportApi::new(AppConfig::default());
    api.set_rates(rate_table(&[("KARNATAKA", 55.0)])).unwrap();
    api.upload_order_text("orders.txt", &sample_txt(), ReportFormat::TabDelimited)
        .unwrap();
    api
}

#[tokio::test]
async fn test_full_session_from_files() {
    self_ship_calc::logging::init_test();
    let orders = write_temp_file(".txt", &sample_txt()).unwrap();
    let rates = write_temp_file(".csv", &rate_csv(&[("Karnataka", "55"), ("Goa", "abc")])).unwrap();

    let api = ReportApi::new(AppConfig::default());
    let source = FileRateSource::new(rates.path());
    let (loaded, uploaded) = futures::join!(api.load_rates(&source), api.upload_order_file(orders.path()));

    assert_eq!(
        loaded.unwrap(),
        RateLoadSummary {
            states: 1,
            fell_back: false
        }
    );
    let info = match uploaded.unwrap() {
        UploadOutcome::Applied(info) => info,
        other => panic!("unexpected outcome: {:?}", other),
    };
    assert_eq!(info.format, ReportFormat::TabDelimited);
    assert!(info.converted);
    assert_eq!(info.row_count, 3);

    let result = api.process().unwrap();
    assert_eq!(result.orders.len(), 1);
    assert_eq!(result.orders[0].shipping_cost, 110.0);
    assert_eq!(result.products.len(), 2);
    assert_eq!(result.total_shipping_revenue, 60.0);
    assert_eq!(api.latest_result().unwrap().unwrap().run_id, result.run_id);

    let shipping = api.export_shipping_csv().unwrap();
    assert!(shipping.starts_with("S.No.,Order ID,State,"));
    assert!(shipping.contains("1,A1,KARNATAKA,2.00,2,55,110"));

    let sales = api.export_sales_csv().unwrap();
    assert!(sales.contains("Widget,2,1,4,500.00"));
    assert!(sales.contains("Lamp,1,0,1,150.00"));
}

#[tokio::test]
async fn test_missing_rate_file_falls_back_to_default() {
    let api = ReportApi::new(AppConfig::default());
    let summary = api
        .load_rates(&FileRateSource::new("/nonexistent/rates.csv"))
        .await
        .unwrap();
    assert!(summary.fell_back);
    assert_eq!(summary.states, 0);

    api.upload_order_text("orders.txt", &sample_txt(), ReportFormat::TabDelimited)
        .unwrap();
    let result = api.process().unwrap();
    assert!(result.orders[0].rate_was_defaulted);
    assert_eq!(result.orders[0].shipping_cost, 120.0);
}

#[tokio::test]
async fn test_static_rate_source() {
    let api = ReportApi::new(AppConfig::default());
    let summary = api
        .load_rates(&StaticRateSource::new(rate_table(&[("GOA", 70.0), ("KERALA", 40.0)])))
        .await
        .unwrap();
    assert_eq!(summary.states, 2);
    assert_eq!(api.rate_table().unwrap().lookup("goa"), Some(70.0));
}

#[tokio::test]
async fn test_unsupported_extension_is_rejected() {
    let file = write_temp_file(".xlsx", "not a report").unwrap();
    let api = ReportApi::new(AppConfig::default());

    let err = api.upload_order_file(file.path()).await.unwrap_err();
    assert!(matches!(err, ApiError::Import(ImportError::UnsupportedFormat(_))));
    assert!(api.report_info().unwrap().is_none());
}

#[test]
fn test_failed_upload_keeps_previous_report_and_result() {
    let api = ready_api();
    let before = api.process().unwrap();

    let bad = "order\tproduct\nA1\tWidget\n";
    let err = api
        .upload_order_text("broken.txt", bad, ReportFormat::TabDelimited)
        .unwrap_err();
    assert!(matches!(err, ApiError::Import(_)));

    assert_eq!(api.report_info().unwrap().unwrap().file_name, "orders.txt");
    assert_eq!(api.latest_result().unwrap().unwrap().run_id, before.run_id);
    assert!(api.export_shipping_csv().is_ok());
}

#[test]
fn test_new_upload_clears_previous_result() {
    let api = ready_api();
    api.process().unwrap();

    let text = csv_report(&["Z1,Mug - Pack of 1,1,Goa,Shipped,100,0,0"]);
    api.upload_order_text("orders.csv", &text, ReportFormat::Csv).unwrap();

    assert!(api.latest_result().unwrap().is_none());
    assert!(matches!(api.export_shipping_csv(), Err(ApiError::ExportEmpty)));

    let result = api.process().unwrap();
    assert_eq!(result.orders[0].order_id, "Z1");
}

#[test]
fn test_late_commit_is_superseded() {
    let api = ReportApi::new(AppConfig::default());
    let importer = OrderReportImporter::new(5);

    let slow = api.begin_upload().unwrap();
    let fast = api.begin_upload().unwrap();

    let fresh = importer.import_text("fresh.txt", &sample_txt(), ReportFormat::TabDelimited);
    assert!(matches!(api.commit_upload(fast, fresh).unwrap(), UploadOutcome::Applied(_)));

    // 过期凭证的解析错误同样被丢弃
    let stale = importer.import_text("stale.txt", "a\tb\n", ReportFormat::TabDelimited);
    assert!(stale.is_err());
    assert!(matches!(
        api.commit_upload(slow, stale).unwrap(),
        UploadOutcome::Superseded { .. }
    ));
    assert_eq!(api.report_info().unwrap().unwrap().file_name, "fresh.txt");
}

#[test]
fn test_export_without_orders_is_empty() {
    let api = ReportApi::new(AppConfig::default());
    api.set_rates(rate_table(&[])).unwrap();
    let text = csv_report(&["P1,Lamp - Pack of 1,1,Goa,Pending,100,0,0"]);
    api.upload_order_text("orders.csv", &text, ReportFormat::Csv).unwrap();

    let result = api.process().unwrap();
    assert!(result.orders.is_empty());
    assert!(matches!(api.export_shipping_csv(), Err(ApiError::ExportEmpty)));
    assert!(api.export_sales_csv().unwrap().contains("Lamp,1,0,1,100.00"));
}

#[test]
fn test_locked_capability() {
    let gate = Arc::new(StaticGate::new([Capability::Upload, Capability::Process]));
    let api = ReportApi::with_gate(AppConfig::default(), gate);
    api.set_rates(rate_table(&[])).unwrap();
    api.upload_order_text("orders.txt", &sample_txt(), ReportFormat::TabDelimited)
        .unwrap();
    api.process().unwrap();

    assert!(matches!(
        api.export_shipping_csv(),
        Err(ApiError::FeatureLocked(Capability::Export))
    ));
}

#[test]
fn test_process_error_messages() {
    let api = ReportApi::new(AppConfig::default());
    assert!(matches!(api.process(), Err(ApiError::NoOrderData)));
    assert!(matches!(api.export_sales_csv(), Err(ApiError::ExportEmpty)));
}
