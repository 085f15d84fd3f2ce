// ==========================================
// 自发货运费核算系统 - 导出层
// ==========================================
// 职责: 将已计算的核算结果序列化为 CSV
// ==========================================

pub mod csv_exporter;

pub use csv_exporter::{
    format_amount, product_sales_csv, shipping_results_csv, write_product_sales,
    write_shipping_results, ExportError, SALES_FILE_NAME, SALES_HEADERS, SHIPPING_FILE_NAME,
    SHIPPING_HEADERS,
};
