//! `stock-report`：批次報表

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use stock_calc::{
    InventoryExporter, SalesAggregate, SalesAggregator, StockControlCalculator, StoreClassifier,
    TurnoverCalculator,
};
use stock_core::InventorySnapshot;
use stock_io::{table, DEFAULT_CLASSIFIER_PATH};

/// 銷售摘要檔名
pub const SALES_SUMMARY_FILE: &str = "sales_summary.json";
/// 庫存天數報表檔名
pub const STOCK_CONTROL_FILE: &str = "stock_control.json";
/// 週轉分析報表檔名
pub const TURNOVER_FILE: &str = "stock_control_turnover.json";
/// 庫存匯出（完整）檔名
pub const INVENTORY_DATA_FILE: &str = "inventory_data.json";
/// 庫存匯出（摘要）檔名
pub const INVENTORY_SUMMARY_FILE: &str = "inventory_summary.json";

/// 預設實體
pub const DEFAULT_ENTITY: &str = "DDD";

#[derive(Debug, Parser)]
#[command(name = "stock-report", version, about = "零售庫存健康度批次報表")]
pub struct ReportCli {
    /// 門市分類表
    #[arg(long, global = true, default_value = DEFAULT_CLASSIFIER_PATH)]
    pub classifier: PathBuf,

    /// 報表輸出目錄
    #[arg(long, global = true, default_value = ".")]
    pub out_dir: PathBuf,

    #[command(subcommand)]
    pub command: ReportCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// 銷售摘要：依 (SKU, 門市) 與門市彙總
    Sales {
        /// 銷售明細 CSV
        #[arg(long)]
        sales: PathBuf,

        /// 終端顯示前 N 名
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// 門市庫存天數（DOS）
    Dos {
        /// 銷售明細 CSV，或先前輸出的 sales_summary.json
        #[arg(long)]
        sales: PathBuf,

        /// 庫存快照（.json 或舊版儀表板 .html）
        #[arg(long)]
        inventory: PathBuf,

        #[arg(long, default_value = DEFAULT_ENTITY)]
        entity: String,

        #[arg(long, default_value_t = 20)]
        top: usize,
    },

    /// 商品代碼週轉分析（含地區拆分）
    Turnover {
        #[arg(long)]
        sales: PathBuf,

        #[arg(long)]
        inventory: PathBuf,

        /// 只處理指定實體（可重複）；未指定時處理全部
        #[arg(long)]
        entity: Vec<String>,

        #[arg(long, default_value_t = 20)]
        top: usize,
    },

    /// 單一實體的庫存匯出
    Export {
        #[arg(long)]
        inventory: PathBuf,

        #[arg(long, default_value = DEFAULT_ENTITY)]
        entity: String,

        /// 摘要保留的 SKU 數
        #[arg(long, default_value_t = 100)]
        top: usize,
    },
}

/// 執行報表命令，返回寫出的檔案
pub fn run(cli: &ReportCli) -> Result<Vec<PathBuf>> {
    let classifier = stock_io::load_classifier(&cli.classifier)
        .with_context(|| format!("無法載入分類表 {}", cli.classifier.display()))?;

    match &cli.command {
        ReportCommand::Sales { sales, top } => {
            let aggregate = sales_aggregate(&classifier, sales)?;
            print!("{}", table::sales_summary(&aggregate, *top));

            let path = stock_io::write_report(&cli.out_dir, SALES_SUMMARY_FILE, &aggregate)?;
            Ok(vec![path])
        }

        ReportCommand::Dos {
            sales,
            inventory,
            entity,
            top,
        } => {
            let aggregate = if is_json(sales) {
                stock_io::read_report::<SalesAggregate>(sales)
                    .with_context(|| format!("無法讀取銷售摘要 {}", sales.display()))?
            } else {
                sales_aggregate(&classifier, sales)?
            };

            let snapshot = load_snapshot(inventory)?;
            let entity_inventory = snapshot.entity(entity).cloned().unwrap_or_else(|| {
                tracing::warn!("庫存快照中找不到實體: {}", entity);
                Default::default()
            });

            let result =
                StockControlCalculator::new(&classifier).calculate(&entity_inventory, &aggregate);
            print!("{}", table::stock_control(&result, *top));

            let path = stock_io::write_report(&cli.out_dir, STOCK_CONTROL_FILE, &result)?;
            Ok(vec![path])
        }

        ReportCommand::Turnover {
            sales,
            inventory,
            entity,
            top,
        } => {
            let load = stock_io::load_sales(sales)
                .with_context(|| format!("無法讀取銷售資料 {}", sales.display()))?;
            let by_product = SalesAggregator::new(&classifier).by_product_month(&load.records);

            let snapshot = load_snapshot(inventory)?;
            let report = TurnoverCalculator::new(&classifier).calculate(&by_product, &snapshot, entity);
            print!("{}", table::turnover(&report, *top));

            let path = stock_io::write_report(&cli.out_dir, TURNOVER_FILE, &report)?;
            Ok(vec![path])
        }

        ReportCommand::Export {
            inventory,
            entity,
            top,
        } => {
            let snapshot = load_snapshot(inventory)?;
            let entity_inventory = snapshot
                .entity(entity)
                .with_context(|| format!("庫存快照中找不到實體 {}", entity))?;

            let export = InventoryExporter::new(&classifier).export(entity_inventory);
            print!("{}", table::export_summary(&export));

            let data = stock_io::write_report(&cli.out_dir, INVENTORY_DATA_FILE, &export)?;
            let summary =
                stock_io::write_report(&cli.out_dir, INVENTORY_SUMMARY_FILE, &export.summary(*top))?;
            Ok(vec![data, summary])
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// 讀取 CSV 並依 (SKU, 門市) 彙總；明細筆數以排除包材後的商品列計
fn sales_aggregate(classifier: &StoreClassifier, path: &Path) -> Result<SalesAggregate> {
    let load = stock_io::load_sales(path)
        .with_context(|| format!("無法讀取銷售資料 {}", path.display()))?;

    let mut aggregate = SalesAggregator::new(classifier).aggregate(&load.records);
    aggregate.total_transactions = load.product_rows;
    Ok(aggregate)
}

fn load_snapshot(path: &Path) -> Result<InventorySnapshot> {
    stock_io::load_inventory(path)
        .with_context(|| format!("無法讀取庫存快照 {}", path.display()))
}
