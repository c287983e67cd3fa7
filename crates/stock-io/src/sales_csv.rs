//! 銷售明細 CSV 解析
//!
//! 格式：分號分隔、第一行為表頭。欄位不足的列以空字串補齊；
//! 包材 SKU 與不完整的列直接略過。

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;
use std::path::Path;

use stock_core::{is_packaging_sku, Result, SalesRecord, StockError};

/// 訂單日期欄
pub const COL_DATE: &str = "Tanggal Pesanan";
/// 門市欄
pub const COL_STORE: &str = "Toko";
/// SKU 欄
pub const COL_SKU: &str = "Sku";
/// 數量欄
pub const COL_QTY: &str = "Jumlah";
/// 商品名稱欄
pub const COL_PRODUCT: &str = "Produk";

/// CSV 原始列：表頭 → 欄位值
pub type CsvRow = HashMap<String, String>;

/// 解析 CSV 內容為原始列
pub fn parse_rows(content: &str) -> Result<Vec<CsvRow>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(Trim::Headers)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| StockError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| StockError::Csv(e.to_string()))?;

        // 跳過空白列
        if record.iter().all(|v| v.trim().is_empty()) {
            continue;
        }

        let row: CsvRow = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| (header.clone(), record.get(idx).unwrap_or("").to_string()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// 取整數前綴（"12"、"12 pcs"、"+3" 皆可）
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let digits_start = usize::from(value.starts_with(|c: char| c == '+' || c == '-'));
    let digits_len = value[digits_start..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();

    if digits_len == 0 {
        return None;
    }

    value[..digits_start + digits_len].parse().ok()
}

fn field<'a>(row: &'a CsvRow, column: &str) -> &'a str {
    row.get(column).map(String::as_str).unwrap_or("")
}

/// 是否為商品銷售列（SKU 非空且不是包材）
pub fn is_product_row(row: &CsvRow) -> bool {
    let sku = field(row, COL_SKU).trim();
    !sku.is_empty() && !is_packaging_sku(sku)
}

/// 原始列 → 銷售紀錄；缺日期、門市、SKU 或數量非正數時返回 None
pub fn row_to_record(row: &CsvRow) -> Option<SalesRecord> {
    let date_text: String = field(row, COL_DATE).trim_start().chars().take(10).collect();
    let date = NaiveDate::parse_from_str(&date_text, "%Y-%m-%d").ok()?;

    let store = field(row, COL_STORE).trim();
    let sku = field(row, COL_SKU).trim();
    if store.is_empty() || sku.is_empty() {
        return None;
    }

    let quantity = parse_leading_int(field(row, COL_QTY))?;
    if quantity <= 0 {
        return None;
    }

    Some(
        SalesRecord::new(sku.to_string(), store.to_string(), date, quantity)
            .with_product_name(field(row, COL_PRODUCT).trim().to_string()),
    )
}

/// 銷售資料載入結果
#[derive(Debug, Clone, Default)]
pub struct SalesLoad {
    /// 有效的商品銷售紀錄
    pub records: Vec<SalesRecord>,

    /// CSV 資料列數
    pub total_rows: usize,

    /// 排除包材後的商品列數（含後續被略過的不完整列）
    pub product_rows: usize,
}

impl SalesLoad {
    /// 被略過的商品列數
    pub fn skipped_rows(&self) -> usize {
        self.product_rows - self.records.len()
    }
}

/// 解析 CSV 內容為銷售紀錄
pub fn parse_sales(content: &str) -> Result<SalesLoad> {
    let rows = parse_rows(content)?;
    let total_rows = rows.len();

    let product_rows: Vec<&CsvRow> = rows.iter().filter(|row| is_product_row(row)).collect();
    let records: Vec<SalesRecord> = product_rows
        .iter()
        .filter_map(|row| row_to_record(row))
        .collect();

    let load = SalesLoad {
        records,
        total_rows,
        product_rows: product_rows.len(),
    };

    tracing::info!(
        "銷售資料：{} 列，商品 {} 列，有效 {} 筆",
        load.total_rows,
        load.product_rows,
        load.records.len()
    );
    if load.skipped_rows() > 0 {
        tracing::debug!("略過不完整的銷售列 {} 筆", load.skipped_rows());
    }

    Ok(load)
}

/// 讀取銷售 CSV 檔案（非 UTF-8 位元組以替代字元處理）
pub fn load_sales(path: &Path) -> Result<SalesLoad> {
    let bytes = std::fs::read(path).map_err(|e| StockError::io(path.display().to_string(), e))?;
    let content = String::from_utf8_lossy(&bytes);

    tracing::debug!("讀取銷售檔案: {}", path.display());
    parse_sales(&content)
}
