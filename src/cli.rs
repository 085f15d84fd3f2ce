// ==========================================
// 自发货运费核算系统 - 命令行参数
// ==========================================

use crate::config::AppConfig;
use crate::domain::{PackPolicy, SalesSortPolicy};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "self-ship-calc")]
#[command(about = "根据订单报表和州运费表核算自发货运费，并按规格汇总产品销量")]
#[command(version)]
pub struct CliArgs {
    /// 订单报表（.txt 制表符分隔 或 .csv）
    #[arg(long, short = 'o', value_name = "FILE")]
    pub orders: PathBuf,

    /// 运费表 CSV（列: State, Rate_per_kg）；缺省时取配置中的 rate_table_path
    #[arg(long, short = 'r', value_name = "CSV")]
    pub rates: Option<PathBuf>,

    /// 配置文件（JSON）
    #[arg(long, short = 'c', value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// 导出运费明细 CSV
    #[arg(long, value_name = "CSV")]
    pub shipping_out: Option<PathBuf>,

    /// 导出产品销量 CSV
    #[arg(long, value_name = "CSV")]
    pub sales_out: Option<PathBuf>,

    /// 未标注 "pack of N" 的产品不计入任何规格
    #[arg(long)]
    pub strict_pack: bool,

    /// 产品销量按数量而非销售额排序
    #[arg(long)]
    pub sort_by_units: bool,

    /// 以 JSON 输出核算结果
    #[arg(long)]
    pub json: bool,

    /// 以 JSON 行输出日志
    #[arg(long)]
    pub log_json: bool,
}

impl CliArgs {
    /// 命令行开关覆盖配置文件
    pub fn apply_overrides(&self, mut config: AppConfig) -> AppConfig {
        if self.strict_pack {
            config.pack_policy = PackPolicy::Strict;
        }
        if self.sort_by_units {
            config.sales_sort = SalesSortPolicy::ByUnits;
        }
        if let Some(rates) = &self.rates {
            config.rate_table_path = Some(rates.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_args() {
        let args = CliArgs::try_parse_from(["self-ship-calc", "--orders", "orders.txt"]).unwrap();
        assert_eq!(args.orders, PathBuf::from("orders.txt"));
        assert!(args.rates.is_none());
        assert!(!args.json);
    }

    #[test]
    fn test_overrides() {
        let args = CliArgs::try_parse_from([
            "self-ship-calc",
            "-o",
            "orders.csv",
            "--rates",
            "rates.csv",
            "--strict-pack",
            "--sort-by-units",
        ])
        .unwrap();

        let config = args.apply_overrides(AppConfig::default());
        assert_eq!(config.pack_policy, PackPolicy::Strict);
        assert_eq!(config.sales_sort, SalesSortPolicy::ByUnits);
        assert_eq!(config.rate_table_path, Some(PathBuf::from("rates.csv")));
    }

    #[test]
    fn test_orders_required() {
        assert!(CliArgs::try_parse_from(["self-ship-calc"]).is_err());
    }
}
