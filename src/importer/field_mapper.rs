// ==========================================
// 自发货运费核算系统 - 字段映射器
// ==========================================
// 职责: 报表列 → RawRow 映射 + 容错类型转换
// ==========================================

use crate::domain::RawRow;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::file_parser::RawRecord;
use crate::importer::importer_trait::RecordMapper;

/// 订单报表列名（区分大小写）
pub mod columns {
    pub const ORDER_ID: &str = "amazon-order-id";
    pub const PRODUCT_NAME: &str = "product-name";
    pub const QUANTITY: &str = "quantity";
    pub const SHIP_STATE: &str = "ship-state";
    pub const ORDER_STATUS: &str = "order-status";
    pub const ITEM_PRICE: &str = "item-price";
    pub const PROMOTION_DISCOUNT: &str = "item-promotion-discount";
    pub const SHIPPING_PRICE: &str = "shipping-price";
}

pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }
}

impl RecordMapper for FieldMapper {
    fn map_to_raw_row(&self, row: &RawRecord) -> RawRow {
        let get = |key: &str| row.get(key).map(String::as_str);

        RawRow {
            order_id: self.cleaner.normalize_null(get(columns::ORDER_ID)),
            product_name: self.cleaner.normalize_null(get(columns::PRODUCT_NAME)),
            quantity: self.cleaner.parse_quantity(get(columns::QUANTITY)),
            ship_state: self.cleaner.clean_text(get(columns::SHIP_STATE).unwrap_or(""), false),
            order_status: self
                .cleaner
                .clean_text(get(columns::ORDER_STATUS).unwrap_or(""), false),
            item_price: self.cleaner.parse_decimal(get(columns::ITEM_PRICE)),
            promotion_discount: self.cleaner.parse_decimal(get(columns::PROMOTION_DISCOUNT)),
            shipping_price: self.cleaner.parse_decimal(get(columns::SHIPPING_PRICE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_map_full_row() {
        let row = record(&[
            ("amazon-order-id", " 403-1 "),
            ("product-name", " Widget - Pack of 2 "),
            ("quantity", "2"),
            ("ship-state", " Karnataka "),
            ("order-status", " Shipped "),
            ("item-price", "499.00"),
            ("item-promotion-discount", "50"),
            ("shipping-price", "40"),
        ]);

        let mapped = FieldMapper::default().map_to_raw_row(&row);
        assert_eq!(mapped.order_id.as_deref(), Some("403-1"));
        assert_eq!(mapped.product_name.as_deref(), Some("Widget - Pack of 2"));
        assert_eq!(mapped.quantity, 2);
        assert_eq!(mapped.ship_state, "Karnataka");
        assert_eq!(mapped.order_status, "Shipped");
        assert_eq!(mapped.item_price, 499.0);
        assert_eq!(mapped.promotion_discount, 50.0);
        assert_eq!(mapped.shipping_price, 40.0);
    }

    #[test]
    fn test_map_missing_fields_use_defaults() {
        let row = record(&[("amazon-order-id", "  "), ("quantity", "n/a")]);
        let mapped = FieldMapper::default().map_to_raw_row(&row);
        assert_eq!(mapped, RawRow::default());
    }
}
