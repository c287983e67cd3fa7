//! `stock-query`：庫存查詢工具

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use stock_calc::query::AREA_RESULT_LIMIT;
use stock_calc::InventoryQuery;
use stock_core::{Area, ItemType};
use stock_io::DEFAULT_CLASSIFIER_PATH;

/// 預設庫存快照路徑
pub const DEFAULT_INVENTORY_PATH: &str = "inventory.json";

const EXAMPLES: &str = "\
Examples:
  stock-query search z2mf01z24
  stock-query store zuma singaraja
  stock-query area \"jawa timur\"
  stock-query area bali warehouse
  stock-query stats";

#[derive(Debug, Parser)]
#[command(
    name = "stock-query",
    version,
    about = "庫存查詢工具（輸出 JSON）",
    after_help = EXAMPLES
)]
pub struct QueryCli {
    /// 庫存快照（.json 或舊版儀表板 .html）
    #[arg(long, default_value = DEFAULT_INVENTORY_PATH)]
    pub inventory: PathBuf,

    /// 門市分類表
    #[arg(long, default_value = DEFAULT_CLASSIFIER_PATH)]
    pub classifier: PathBuf,

    #[command(subcommand)]
    pub command: QueryCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum QueryCommand {
    /// 在所有門市搜尋 SKU 或商品代碼
    #[command(alias = "sku")]
    Search { sku: String },

    /// 門市庫存摘要（名稱可含空白）
    Store {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// 地區庫存（最多 50 筆）
    Area {
        area: Area,

        #[arg(default_value = "retail")]
        item_type: ItemType,
    },

    /// 整體統計
    Stats,
}

/// 執行查詢，返回縮排 JSON
pub fn run(cli: &QueryCli) -> Result<String> {
    let classifier = stock_io::load_classifier(&cli.classifier)
        .with_context(|| format!("無法載入分類表 {}", cli.classifier.display()))?;
    let snapshot = stock_io::load_inventory(&cli.inventory)
        .with_context(|| format!("無法讀取庫存快照 {}", cli.inventory.display()))?;

    let query = InventoryQuery::new(&snapshot, &classifier);

    let output = match &cli.command {
        QueryCommand::Search { sku } => serde_json::to_string_pretty(&query.search_sku(sku))?,
        QueryCommand::Store { name } => {
            serde_json::to_string_pretty(&query.store_summary(&name.join(" ")))?
        }
        QueryCommand::Area { area, item_type } => serde_json::to_string_pretty(
            &query.stock_by_area(*area, *item_type, AREA_RESULT_LIMIT),
        )?,
        QueryCommand::Stats => serde_json::to_string_pretty(&query.stats())?,
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_area_command() {
        let cli = QueryCli::try_parse_from(["stock-query", "area", "jawa timur", "warehouse"]).unwrap();
        match cli.command {
            QueryCommand::Area { area, item_type } => {
                assert_eq!(area, Area::JawaTimur);
                assert_eq!(item_type, ItemType::Warehouse);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_store_name_words_joined() {
        let cli = QueryCli::try_parse_from(["stock-query", "store", "zuma", "singaraja"]).unwrap();
        match cli.command {
            QueryCommand::Store { name } => assert_eq!(name.join(" "), "zuma singaraja"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_sku_alias() {
        let cli = QueryCli::try_parse_from(["stock-query", "sku", "z2mf01"]).unwrap();
        assert!(matches!(cli.command, QueryCommand::Search { .. }));
    }

    #[test]
    fn test_invalid_arguments_rejected() {
        assert!(QueryCli::try_parse_from(["stock-query"]).is_err());
        assert!(QueryCli::try_parse_from(["stock-query", "search"]).is_err());
        assert!(QueryCli::try_parse_from(["stock-query", "store"]).is_err());
        assert!(QueryCli::try_parse_from(["stock-query", "area", "mars"]).is_err());
        assert!(QueryCli::try_parse_from(["stock-query", "area", "bali", "online"]).is_err());
        assert!(QueryCli::try_parse_from(["stock-query", "unknown"]).is_err());
    }
}
