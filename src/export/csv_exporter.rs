// ==========================================
// 自发货运费核算系统 - CSV 导出
// ==========================================
// 运费明细列: S.No., Order ID, State, Total Weight (kg), Rounded Weight (kg),
//             Rate per kg, Shipping Cost
// 产品销量列: S.No., Product Name, Pack of One Sold, Pack of Two Sold,
//             Total Units, Total Sales
// ==========================================

use crate::domain::{OrderAggregate, ProductAggregate};
use csv::Writer;
use std::path::Path;
use thiserror::Error;

pub const SHIPPING_HEADERS: [&str; 7] = [
    "S.No.",
    "Order ID",
    "State",
    "Total Weight (kg)",
    "Rounded Weight (kg)",
    "Rate per kg",
    "Shipping Cost",
];

pub const SALES_HEADERS: [&str; 6] = [
    "S.No.",
    "Product Name",
    "Pack of One Sold",
    "Pack of Two Sold",
    "Total Units",
    "Total Sales",
];

pub const SHIPPING_FILE_NAME: &str = "shipping_calculation_results.csv";
pub const SALES_FILE_NAME: &str = "product_sales_by_variant.csv";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("文件写入失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("导出内容编码失败: {0}")]
    Encoding(String),
}

/// 运费明细 CSV 文本
pub fn shipping_results_csv(orders: &[OrderAggregate]) -> Result<String, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(SHIPPING_HEADERS)?;

    for (idx, order) in orders.iter().enumerate() {
        writer.write_record([
            (idx + 1).to_string(),
            order.order_id.clone(),
            order.state.clone(),
            format!("{:.2}", order.total_weight_kg),
            order.rounded_weight_kg.to_string(),
            format_amount(order.rate_per_kg),
            format_amount(order.shipping_cost),
        ])?;
    }

    finish(writer)
}

/// 产品销量 CSV 文本
pub fn product_sales_csv(products: &[ProductAggregate]) -> Result<String, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(SALES_HEADERS)?;

    for (idx, product) in products.iter().enumerate() {
        writer.write_record([
            (idx + 1).to_string(),
            product.base_name.clone(),
            product.pack_of_one_sold.to_string(),
            product.pack_of_two_sold.to_string(),
            product.total_units().to_string(),
            format!("{:.2}", product.total_sales),
        ])?;
    }

    finish(writer)
}

pub fn write_shipping_results<P: AsRef<Path>>(
    path: P,
    orders: &[OrderAggregate],
) -> Result<(), ExportError> {
    std::fs::write(path, shipping_results_csv(orders)?)?;
    Ok(())
}

pub fn write_product_sales<P: AsRef<Path>>(
    path: P,
    products: &[ProductAggregate],
) -> Result<(), ExportError> {
    std::fs::write(path, product_sales_csv(products)?)?;
    Ok(())
}

/// 金额格式: 整数值不带小数部分，其余取最短可还原表示（55 / 55.5）
pub fn format_amount(value: f64) -> String {
    format!("{}", value)
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Encoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> OrderAggregate {
        OrderAggregate {
            order_id: "171-555".to_string(),
            state: "TAMIL NADU".to_string(),
            pack_of_one_count: 3,
            pack_of_two_count: 0,
            line_items: Vec::new(),
            total_weight_kg: 1.5,
            rounded_weight_kg: 2,
            rate_per_kg: 45.5,
            shipping_cost: 91.0,
            rate_was_defaulted: false,
        }
    }

    #[test]
    fn test_shipping_results_csv() {
        let csv = shipping_results_csv(&[order()]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "S.No.,Order ID,State,Total Weight (kg),Rounded Weight (kg),Rate per kg,Shipping Cost"
        );
        assert_eq!(lines.next().unwrap(), "1,171-555,TAMIL NADU,1.50,2,45.5,91");
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_product_sales_csv_quotes_names() {
        let mut product = ProductAggregate::new("Widget, Blue");
        product.pack_of_one_sold = 2;
        product.pack_of_two_sold = 3;
        product.total_sales = 1234.5;

        let csv = product_sales_csv(&[product]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "1,\"Widget, Blue\",2,3,8,1234.50");
    }

    #[test]
    fn test_headers_only_when_empty() {
        let csv = product_sales_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_write_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SHIPPING_FILE_NAME);

        write_shipping_results(&path, &[order()]).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, shipping_results_csv(&[order()]).unwrap());

        let sales_path = dir.path().join(SALES_FILE_NAME);
        write_product_sales(&sales_path, &[]).unwrap();
        assert!(std::fs::read_to_string(&sales_path).unwrap().starts_with("S.No.,Product Name"));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(60.0), "60");
        assert_eq!(format_amount(55.5), "55.5");
    }
}
