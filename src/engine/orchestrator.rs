// ==========================================
// 自发货运费核算系统 - 核算编排器
// ==========================================
// 用途: 对同一份 RawRow 序列依次执行订单运费汇总与产品销量汇总
// 红线: 整体成功才产出 RunResult；任一阶段失败只返回一个 ProcessingError
// ==========================================

use crate::config::AppConfig;
use crate::domain::{RateTable, RawRow, RunResult};
use crate::engine::error::{ProcessingError, ProcessingResult};
use crate::engine::order_aggregator::{OrderAggregator, PackWeights};
use crate::engine::pack_classifier::PackClassifier;
use crate::engine::sales_aggregator::SalesAggregator;
use chrono::Utc;
use std::panic::{self, AssertUnwindSafe};
use tracing::{error, info};
use uuid::Uuid;

// ==========================================
// ReportOrchestrator - 核算编排器
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct ReportOrchestrator {
    orders: OrderAggregator,
    sales: SalesAggregator,
    default_rate: f64,
}

impl ReportOrchestrator {
    pub fn new(orders: OrderAggregator, sales: SalesAggregator, default_rate: f64) -> Self {
        Self {
            orders,
            sales,
            default_rate,
        }
    }

    /// 按配置组装两个汇总引擎
    pub fn from_config(config: &AppConfig) -> Self {
        let classifier = PackClassifier::new(config.pack_policy);
        let weights = PackWeights {
            pack_of_one_kg: config.pack_of_one_weight_kg,
            pack_of_two_kg: config.pack_of_two_weight_kg,
        };

        Self::new(
            OrderAggregator::new(classifier, weights),
            SalesAggregator::new(classifier, config.sales_sort),
            config.default_rate_per_kg,
        )
    }

    /// 执行一次完整核算
    ///
    /// # 返回
    /// - Ok(RunResult): 全新的核算结果
    /// - Err(ProcessingError): 任一阶段失败（含意外 panic）
    pub fn run(&self, rows: &[RawRow], rates: &RateTable) -> ProcessingResult<RunResult> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run_inner(rows, rates)));

        match outcome {
            Ok(result) => result,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "未知异常".to_string());
                error!(%message, "核算过程发生异常");
                Err(ProcessingError::Panicked(message))
            }
        }
    }

    fn run_inner(&self, rows: &[RawRow], rates: &RateTable) -> ProcessingResult<RunResult> {
        let orders = self.orders.compute_orders(rows, rates, self.default_rate)?;
        let sales = self.sales.compute_sales(rows)?;

        let result = RunResult {
            run_id: Uuid::new_v4().to_string(),
            processed_at: Utc::now(),
            orders,
            products: sales.products,
            total_shipping_revenue: sales.total_shipping_revenue,
        };

        info!(
            run_id = %result.run_id,
            orders = result.orders.len(),
            products = result.products.len(),
            total_shipping_cost = result.total_shipping_cost(),
            "核算完成"
        );

        Ok(result)
    }
}

impl Default for ReportOrchestrator {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_RATE_PER_KG;

    fn shipped(order: &str, product: &str) -> RawRow {
        RawRow {
            order_id: Some(order.to_string()),
            product_name: Some(product.to_string()),
            order_status: "Shipped".to_string(),
            ship_state: "Kerala".to_string(),
            item_price: 200.0,
            shipping_price: 30.0,
            ..RawRow::default()
        }
    }

    #[test]
    fn test_run_builds_both_views() {
        let rows = vec![shipped("A1", "Widget - Pack of 2"), shipped("A2", "Widget - Pack of 1")];
        let result = ReportOrchestrator::default()
            .run(&rows, &RateTable::new())
            .unwrap();

        assert_eq!(result.orders.len(), 2);
        assert!(result.orders.iter().all(|o| o.rate_per_kg == DEFAULT_RATE_PER_KG));
        assert_eq!(result.products.len(), 1);
        assert_eq!(result.total_shipping_revenue, 60.0);
        assert_eq!(result.average_shipping_cost(), Some(60));
    }

    #[test]
    fn test_run_reports_invalid_default_rate() {
        let orchestrator = ReportOrchestrator::new(
            OrderAggregator::default(),
            SalesAggregator::default(),
            f64::NAN,
        );
        let err = orchestrator.run(&[], &RateTable::new()).unwrap_err();
        assert!(matches!(err, ProcessingError::InvalidDefaultRate(_)));
    }

    #[test]
    fn test_views_are_repeatable() {
        let rows = vec![shipped("A1", "Widget - Pack of 2"), shipped("A1", "Gadget")];
        let rates = RateTable::from_entries([("KERALA", 48.0)]);
        let orchestrator = ReportOrchestrator::default();

        let first = orchestrator.run(&rows, &rates).unwrap();
        let second = orchestrator.run(&rows, &rates).unwrap();
        assert_eq!(first.orders, second.orders);
        assert_eq!(first.products, second.products);
        assert_eq!(first.total_shipping_revenue, second.total_shipping_revenue);
    }
}
