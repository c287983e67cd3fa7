//! 終端表格輸出（固定欄寬）

use std::fmt::Write;

use rust_decimal::Decimal;

use stock_calc::aggregation::SalesAggregate;
use stock_calc::export::InventoryExport;
use stock_calc::stock_control::StockControlResult;
use stock_calc::turnover::TurnoverReport;
use stock_core::WarehouseCode;

/// 依字元數截斷並補齊到固定寬度
pub fn fit(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{:<width$}", truncated, width = width)
}

fn warehouse_label(code: Option<WarehouseCode>, empty: &str) -> String {
    code.map(|c| c.as_str().to_string())
        .unwrap_or_else(|| empty.to_string())
}

fn rate(value: Decimal) -> String {
    format!("{:.1}", value)
}

fn ratio(value: Option<Decimal>) -> String {
    value.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "-".to_string())
}

/// 銷售摘要：銷量前 N 名門市與 SKU
pub fn sales_summary(aggregate: &SalesAggregate, top: usize) -> String {
    let mut out = String::new();

    if let Some(range) = aggregate.date_range {
        let _ = writeln!(
            out,
            "銷售期間: {} ~ {}（{} 天），明細 {} 筆",
            range.start, range.end, range.days, aggregate.total_transactions
        );
    }

    let _ = writeln!(out, "\n=== 門市銷量前 {} 名 ===", top);
    for (i, store) in aggregate.top_stores(top).iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {} ({}) - {} pcs ({}/day) -> {}",
            i + 1,
            store.store,
            store.area,
            store.total_qty,
            rate(store.daily_rate),
            warehouse_label(store.warehouse, "No WH")
        );
    }

    let _ = writeln!(out, "\n=== SKU 銷量前 {} 名 ===", top);
    for (i, sku) in aggregate.top_skus(top).iter().enumerate() {
        let _ = writeln!(out, "{:>2}. {} - {} pcs", i + 1, sku.sku, sku.total_qty);
    }

    out
}

/// 門市庫存天數表，接著列出需補貨的 CRITICAL SKU
pub fn stock_control(result: &StockControlResult, top: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== 門市庫存控管（依 DOS） ===\n");
    let _ = writeln!(
        out,
        "{} | {} | {} | {:>6} | {:>5} | {:>3} | Status",
        fit("Store", 30),
        fit("Area", 10),
        fit("WH", 3),
        "Stock",
        "Daily",
        "DOS"
    );
    let _ = writeln!(out, "{}", "-".repeat(90));

    for store in result.store_control.iter().take(top) {
        let _ = writeln!(
            out,
            "{} | {} | {} | {:>6} | {:>5} | {:>3} | {}",
            fit(&store.store, 30),
            fit(store.area.name(), 10),
            fit(&warehouse_label(store.warehouse, "-"), 3),
            store.total_stock,
            rate(store.total_daily_rate),
            store.avg_dos,
            store.status
        );
    }

    let _ = writeln!(out, "\n=== CRITICAL SKU（DOS < 14 天） ===");
    for row in result.critical_with_warehouse(top) {
        let _ = writeln!(
            out,
            "{} @ {}: {} pcs, {}/day = {} days -> Restock from {}",
            row.sku,
            row.store,
            row.current_stock,
            row.daily_rate,
            row.dos,
            warehouse_label(row.warehouse, "-")
        );
    }

    out
}

/// 週轉分析：倉庫與門市庫存摘要，以及月均銷量前 N 名商品代碼
pub fn turnover(report: &TurnoverReport, top: usize) -> String {
    let mut out = String::new();

    let period: Vec<String> = report
        .sales_period
        .months
        .iter()
        .zip(&report.sales_period.month_names)
        .map(|(month, name)| format!("{} ({})", month, name))
        .collect();

    let _ = writeln!(out, "=== 週轉分析摘要 ===");
    let _ = writeln!(out, "商品代碼: {}", report.items.len());
    let _ = writeln!(out, "銷售月份: {}", period.join(", "));

    let summary = &report.warehouse_summary;
    let _ = writeln!(out, "\n倉庫庫存:");
    let _ = writeln!(out, "  WHS (Jawa Timur): {}", summary.whs);
    let _ = writeln!(out, "  WHB (Bali): {}", summary.whb);
    let _ = writeln!(out, "  WHJ (Jakarta): {}", summary.whj);

    let _ = writeln!(out, "\n門市庫存（依地區）:");
    for (area, qty) in &report.stok_toko_summary.by_area {
        if *qty != 0 {
            let _ = writeln!(out, "  {}: {}", area, qty);
        }
    }
    let _ = writeln!(out, "  TOTAL: {}", report.stok_toko_summary.total);
    let _ = writeln!(out, "\n全部庫存: {}", report.total_global_stock);

    let _ = writeln!(out, "\n=== 月均銷量前 {} 名 ===", top);
    let _ = writeln!(
        out,
        "{} | {} | {:>6} | {:>7} | {:>7} | {:>7} | {:>5} | {:>5}",
        fit("Kode", 12),
        fit("Article", 30),
        "Avg",
        "WH",
        "Toko",
        "Global",
        "TW",
        "TO"
    );
    let _ = writeln!(out, "{}", "-".repeat(100));

    for item in report.items.iter().take(top) {
        let _ = writeln!(
            out,
            "{} | {} | {:>6} | {:>7} | {:>7} | {:>7} | {:>5} | {:>5}",
            fit(&item.kode_kecil, 12),
            fit(&item.article, 30),
            item.avg_sales,
            item.wh_total,
            item.stok_toko,
            item.global_stock,
            ratio(item.tw),
            ratio(item.to)
        );
    }

    out
}

/// 庫存匯出摘要
pub fn export_summary(export: &InventoryExport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Total SKU: {}", export.stats.total_sku);
    let _ = writeln!(out, "門市庫存: {}", export.stats.total_retail_stock);
    let _ = writeln!(out, "倉庫庫存: {}", export.stats.total_warehouse_stock);

    let _ = writeln!(out, "\n依性別:");
    for (gender, qty) in &export.by_gender {
        let _ = writeln!(out, "  {}: {}", gender, qty);
    }

    let _ = writeln!(out, "\n依地區:");
    for (area, qty) in &export.by_area {
        let _ = writeln!(out, "  {}: {}", area, qty);
    }

    out
}
