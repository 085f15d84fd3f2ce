// ==========================================
// 自发货运费核算系统 - 产品销量领域模型
// ==========================================

use serde::{Deserialize, Serialize};

/// 按基础产品名汇总的销量（跨包装规格）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAggregate {
    pub base_name: String,
    pub pack_of_one_sold: u64,
    pub pack_of_two_sold: u64,
    /// 净销售额 = Σ(item_price - promotion_discount)，不做下限截断
    pub total_sales: f64,
}

impl ProductAggregate {
    pub fn new(base_name: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            pack_of_one_sold: 0,
            pack_of_two_sold: 0,
            total_sales: 0.0,
        }
    }

    /// 导出口径的总件数：两件装按 2 件计
    pub fn total_units(&self) -> u64 {
        self.pack_of_one_sold + self.pack_of_two_sold * 2
    }

    /// 排序口径的总数量：单件装 + 两件装（不加权）
    pub fn variant_count(&self) -> u64 {
        self.pack_of_one_sold + self.pack_of_two_sold
    }
}

/// 销量汇总结果
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SalesSummary {
    pub products: Vec<ProductAggregate>,
    pub total_shipping_revenue: f64,
}
