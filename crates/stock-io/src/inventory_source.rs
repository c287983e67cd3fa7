//! 庫存快照載入
//!
//! `.json` 直接以結構化格式解析；`.html` / `.htm` 經舊版儀表板轉接。

use std::path::Path;

use stock_core::{InventorySnapshot, Result, StockError};

use crate::legacy_html;

/// 庫存快照來源格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryFormat {
    Json,
    LegacyHtml,
}

impl InventoryFormat {
    /// 依副檔名判斷；未知副檔名視為 JSON
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("html") | Some("htm") => InventoryFormat::LegacyHtml,
            _ => InventoryFormat::Json,
        }
    }
}

/// 解析快照內容
pub fn parse_inventory(content: &str, format: InventoryFormat) -> Result<InventorySnapshot> {
    match format {
        InventoryFormat::Json => InventorySnapshot::from_json_str(content),
        InventoryFormat::LegacyHtml => legacy_html::extract_snapshot(content),
    }
}

/// 讀取庫存快照檔案
pub fn load_inventory(path: &Path) -> Result<InventorySnapshot> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| StockError::io(path.display().to_string(), e))?;

    let format = InventoryFormat::from_path(path);
    let snapshot = parse_inventory(&content, format)?;

    tracing::info!(
        "庫存快照 {}（{:?}）：實體 {} 個，品項 {} 筆",
        path.display(),
        format,
        snapshot.entities.len(),
        snapshot.item_count()
    );

    Ok(snapshot)
}
