// ==========================================
// 自发货运费核算系统 - 订单运费汇总引擎
// ==========================================
// 输入: RawRow 序列 + 运费表 + 默认费率
// 输出: 每个已发货订单一条 OrderAggregate（按首次出现顺序）
// ==========================================
// 流程:
// 1. 仅保留 order-status = shipped（不区分大小写）
// 2. 按 order_id 分组
// 3. 逐行识别规格，按数量累计单件装/两件装
// 4. 计算重量、计费重量、费率、运费
// ==========================================

use crate::domain::{LineItem, OrderAggregate, PackVariant, RateTable, RawRow};
use crate::engine::error::{ProcessingError, ProcessingResult};
use crate::engine::pack_classifier::PackClassifier;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// 包装规格重量口径（公斤）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackWeights {
    pub pack_of_one_kg: f64,
    pub pack_of_two_kg: f64,
}

impl Default for PackWeights {
    fn default() -> Self {
        Self {
            pack_of_one_kg: 0.5,
            pack_of_two_kg: 1.0,
        }
    }
}

impl PackWeights {
    pub fn total_weight(&self, pack_of_one: u64, pack_of_two: u64) -> f64 {
        pack_of_one as f64 * self.pack_of_one_kg + pack_of_two as f64 * self.pack_of_two_kg
    }
}

// 分组中间态
struct OrderGroup {
    order_id: String,
    state: String,
    pack_of_one: u64,
    pack_of_two: u64,
    line_items: Vec<LineItem>,
}

#[derive(Default)]
struct OrderGroups {
    index: HashMap<String, usize>,
    groups: Vec<OrderGroup>,
}

impl OrderGroups {
    fn accumulate(
        mut self,
        order_id: &str,
        product_name: &str,
        row: &RawRow,
        variant: PackVariant,
    ) -> ProcessingResult<Self> {
        let slot = match self.index.get(order_id) {
            Some(&slot) => slot,
            None => {
                self.groups.push(OrderGroup {
                    order_id: order_id.to_string(),
                    state: row.normalized_state(),
                    pack_of_one: 0,
                    pack_of_two: 0,
                    line_items: Vec::new(),
                });
                self.index.insert(order_id.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };

        let group = &mut self.groups[slot];
        let (one, two) = variant.unit_counts();
        let qty = u64::from(row.quantity);
        let overflow = || ProcessingError::CountOverflow {
            context: format!("order_id={}", order_id),
        };

        group.pack_of_one = group
            .pack_of_one
            .checked_add(one * qty)
            .ok_or_else(overflow)?;
        group.pack_of_two = group
            .pack_of_two
            .checked_add(two * qty)
            .ok_or_else(overflow)?;
        group.line_items.push(LineItem {
            product_name: product_name.to_string(),
            quantity: row.quantity,
        });

        Ok(self)
    }
}

// ==========================================
// OrderAggregator - 订单运费汇总引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderAggregator {
    classifier: PackClassifier,
    weights: PackWeights,
}

impl OrderAggregator {
    pub fn new(classifier: PackClassifier, weights: PackWeights) -> Self {
        Self {
            classifier,
            weights,
        }
    }

    /// 计算每个已发货订单的运费
    ///
    /// # 参数
    /// - rows: 报表行
    /// - rates: 运费表（只读）
    /// - default_rate: 州缺失时使用的每公斤费率
    ///
    /// # 返回
    /// - Ok(Vec<OrderAggregate>): 按订单首次出现顺序
    /// - Err(ProcessingError): 默认费率非法、数值溢出等
    #[instrument(skip(self, rows, rates), fields(rows = rows.len(), states = rates.len()))]
    pub fn compute_orders(
        &self,
        rows: &[RawRow],
        rates: &RateTable,
        default_rate: f64,
    ) -> ProcessingResult<Vec<OrderAggregate>> {
        if !default_rate.is_finite() || default_rate <= 0.0 {
            return Err(ProcessingError::InvalidDefaultRate(default_rate));
        }

        let shipped: Vec<&RawRow> = rows.iter().filter(|r| r.is_shipped()).collect();

        let groups = shipped
            .iter()
            .try_fold(OrderGroups::default(), |acc, row| {
                // 缺少主键的行静默跳过
                match (row.order_id.as_deref(), row.product_name.as_deref()) {
                    (Some(order_id), Some(product_name)) => {
                        let variant = self.classifier.classify(product_name);
                        acc.accumulate(order_id, product_name, row, variant)
                    }
                    _ => Ok(acc),
                }
            })?;

        let orders = groups
            .groups
            .into_iter()
            .map(|group| self.finish(group, rates, default_rate))
            .collect::<ProcessingResult<Vec<_>>>()?;

        let defaulted = orders.iter().filter(|o| o.rate_was_defaulted).count();
        info!(
            shipped_rows = shipped.len(),
            orders = orders.len(),
            defaulted,
            "订单运费计算完成"
        );

        Ok(orders)
    }

    fn finish(
        &self,
        group: OrderGroup,
        rates: &RateTable,
        default_rate: f64,
    ) -> ProcessingResult<OrderAggregate> {
        let total_weight_kg = self
            .weights
            .total_weight(group.pack_of_one, group.pack_of_two);
        let rounded = total_weight_kg.ceil();
        let resolved = rates.resolve(&group.state, default_rate);
        let shipping_cost = rounded * resolved.rate_per_kg;

        if !total_weight_kg.is_finite() || total_weight_kg < 0.0 || !shipping_cost.is_finite() {
            return Err(ProcessingError::NonFiniteValue {
                context: format!(
                    "order_id={}, weight={}, cost={}",
                    group.order_id, total_weight_kg, shipping_cost
                ),
            });
        }

        if resolved.defaulted {
            debug!(order_id = %group.order_id, state = %group.state, "收货州不在运费表中，使用默认费率");
        }

        Ok(OrderAggregate {
            order_id: group.order_id,
            state: group.state,
            pack_of_one_count: group.pack_of_one,
            pack_of_two_count: group.pack_of_two,
            line_items: group.line_items,
            total_weight_kg,
            rounded_weight_kg: rounded as u64,
            rate_per_kg: resolved.rate_per_kg,
            shipping_cost,
            rate_was_defaulted: resolved.defaulted,
        })
    }
}
