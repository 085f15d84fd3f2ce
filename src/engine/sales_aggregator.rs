// ==========================================
// 自发货运费核算系统 - 产品销量汇总引擎
// ==========================================
// 输入: RawRow 序列
// 输出: 按基础产品名汇总的销量 + 运费收入合计
// ==========================================
// 口径:
// - 仅排除 cancelled；pending/unshipped 仍计入销量与收入
// - 运费收入在产品名校验之前累计
// - 净销售额 = item_price - promotion_discount（item_price 已是整行金额，不乘数量）
// ==========================================

use crate::domain::{PackVariant, ProductAggregate, RawRow, SalesSortPolicy, SalesSummary};
use crate::engine::error::{ProcessingError, ProcessingResult};
use crate::engine::pack_classifier::PackClassifier;
use std::collections::HashMap;
use tracing::{info, instrument};

#[derive(Default)]
struct ProductGroups {
    index: HashMap<String, usize>,
    products: Vec<ProductAggregate>,
    shipping_revenue: f64,
}

impl ProductGroups {
    fn accumulate(mut self, base_name: String, variant: PackVariant, row: &RawRow) -> ProcessingResult<Self> {
        let slot = match self.index.get(&base_name) {
            Some(&slot) => slot,
            None => {
                self.products.push(ProductAggregate::new(base_name.clone()));
                self.index.insert(base_name.clone(), self.products.len() - 1);
                self.products.len() - 1
            }
        };

        let product = &mut self.products[slot];
        let (one, two) = variant.unit_counts();
        let qty = u64::from(row.quantity);
        let overflow = || ProcessingError::CountOverflow {
            context: format!("product={}", base_name),
        };

        product.pack_of_one_sold = product
            .pack_of_one_sold
            .checked_add(one * qty)
            .ok_or_else(overflow)?;
        product.pack_of_two_sold = product
            .pack_of_two_sold
            .checked_add(two * qty)
            .ok_or_else(overflow)?;
        product.total_sales += row.item_price - row.promotion_discount;

        Ok(self)
    }
}

// ==========================================
// SalesAggregator - 产品销量汇总引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct SalesAggregator {
    classifier: PackClassifier,
    sort: SalesSortPolicy,
}

impl SalesAggregator {
    pub fn new(classifier: PackClassifier, sort: SalesSortPolicy) -> Self {
        Self { classifier, sort }
    }

    /// 汇总产品销量
    ///
    /// 空输入返回空列表与 0 运费收入
    #[instrument(skip(self, rows), fields(rows = rows.len(), sort = %self.sort))]
    pub fn compute_sales(&self, rows: &[RawRow]) -> ProcessingResult<SalesSummary> {
        let groups = rows
            .iter()
            .filter(|r| !r.is_cancelled())
            .try_fold(ProductGroups::default(), |mut acc, row| {
                acc.shipping_revenue += row.shipping_price;

                match row.product_name.as_deref() {
                    Some(name) => {
                        let (variant, base_name) = self.classifier.split(name);
                        acc.accumulate(base_name, variant, row)
                    }
                    None => Ok(acc),
                }
            })?;

        let mut products = groups.products;
        if let Some(bad) = products.iter().find(|p| !p.total_sales.is_finite()) {
            return Err(ProcessingError::NonFiniteValue {
                context: format!("product={}, total_sales={}", bad.base_name, bad.total_sales),
            });
        }

        // 稳定排序：并列时保持首次出现顺序
        match self.sort {
            SalesSortPolicy::ByRevenue => {
                products.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales))
            }
            SalesSortPolicy::ByUnits => {
                products.sort_by(|a, b| b.variant_count().cmp(&a.variant_count()))
            }
        }

        info!(
            products = products.len(),
            shipping_revenue = groups.shipping_revenue,
            "产品销量汇总完成"
        );

        Ok(SalesSummary {
            products,
            total_shipping_revenue: groups.shipping_revenue,
        })
    }
}
