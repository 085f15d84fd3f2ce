// ==========================================
// 自发货运费核算系统 - 核算结果
// ==========================================
// 生命周期: 每次显式处理请求全新构建，下次上传/重算时整体丢弃
// ==========================================

use crate::domain::order::OrderAggregate;
use crate::domain::product::ProductAggregate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 一次核算的完整结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub run_id: String,
    pub processed_at: DateTime<Utc>,
    pub orders: Vec<OrderAggregate>,
    pub products: Vec<ProductAggregate>,
    pub total_shipping_revenue: f64,
}

impl RunResult {
    /// 运费合计
    pub fn total_shipping_cost(&self) -> f64 {
        self.orders.iter().map(|o| o.shipping_cost).sum()
    }

    /// 单均运费（四舍五入到整数）
    ///
    /// # 返回
    /// - None: 没有订单
    pub fn average_shipping_cost(&self) -> Option<i64> {
        if self.orders.is_empty() {
            return None;
        }
        let avg = self.total_shipping_cost() / self.orders.len() as f64;
        Some(round_half_up(avg) as i64)
    }

    pub fn defaulted_order_count(&self) -> usize {
        self.orders.iter().filter(|o| o.rate_was_defaulted).count()
    }

    pub fn total_pack_of_one_sold(&self) -> u64 {
        self.products.iter().map(|p| p.pack_of_one_sold).sum()
    }

    pub fn total_pack_of_two_sold(&self) -> u64 {
        self.products.iter().map(|p| p.pack_of_two_sold).sum()
    }
}

/// 半数向上取整（-2.5 → -2，2.5 → 3）
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
