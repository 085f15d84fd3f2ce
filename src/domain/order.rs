// ==========================================
// 自发货运费核算系统 - 订单领域模型
// ==========================================
// 职责: 报表行记录、订单明细、订单汇总
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// RawRow - 报表原始行
// ==========================================
// 字段已 TRIM；数值字段解析失败已回落默认值
// order_id / product_name 缺失时由汇总器静默丢弃
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub order_id: Option<String>,     // amazon-order-id
    pub product_name: Option<String>, // product-name
    pub quantity: u32,                // quantity（解析失败 → 1）
    pub ship_state: String,           // ship-state（自由文本）
    pub order_status: String,         // order-status（自由文本）
    pub item_price: f64,              // item-price（整行金额，非单价）
    pub promotion_discount: f64,      // item-promotion-discount
    pub shipping_price: f64,          // shipping-price
}

impl RawRow {
    /// 标准化订单状态（TRIM + 小写）
    pub fn normalized_status(&self) -> String {
        self.order_status.trim().to_lowercase()
    }

    /// 标准化收货州（TRIM + 大写），与运费表键一致
    pub fn normalized_state(&self) -> String {
        self.ship_state.trim().to_uppercase()
    }

    pub fn is_shipped(&self) -> bool {
        self.normalized_status() == "shipped"
    }

    pub fn is_cancelled(&self) -> bool {
        self.normalized_status() == "cancelled"
    }
}

impl Default for RawRow {
    fn default() -> Self {
        Self {
            order_id: None,
            product_name: None,
            quantity: 1,
            ship_state: String::new(),
            order_status: String::new(),
            item_price: 0.0,
            promotion_discount: 0.0,
            shipping_price: 0.0,
        }
    }
}

/// 订单明细行（仅用于详情展示）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_name: String,
    pub quantity: u32,
}

// ==========================================
// OrderAggregate - 订单运费汇总
// ==========================================
// 不变量:
// - total_weight_kg = pack_of_one_count * 0.5 + pack_of_two_count * 1.0（默认重量口径）
// - rounded_weight_kg = ceil(total_weight_kg)
// - shipping_cost = rounded_weight_kg * rate_per_kg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAggregate {
    pub order_id: String,
    pub state: String, // 标准化后的收货州
    pub pack_of_one_count: u64,
    pub pack_of_two_count: u64,
    pub line_items: Vec<LineItem>,
    pub total_weight_kg: f64,
    pub rounded_weight_kg: u64, // 计费重量
    pub rate_per_kg: f64,
    pub shipping_cost: f64,
    pub rate_was_defaulted: bool, // 收货州不在运费表中，使用默认费率
}
