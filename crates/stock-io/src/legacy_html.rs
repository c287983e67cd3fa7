//! 舊版儀表板 HTML 轉接
//!
//! 舊系統把庫存快照以 `const allData = {...};` 內嵌在儀表板頁面中，
//! 後面緊接著 `const allStores`。這裡只取出該段 JSON，其餘頁面內容不解析。

use stock_core::{InventorySnapshot, Result, StockError};

/// 庫存資料起始標記
pub const DATA_MARKER: &str = "const allData =";

/// 庫存資料之後的下一個宣告
pub const NEXT_MARKER: &str = "const allStores";

/// 取出內嵌的庫存 JSON 文字
pub fn extract_inventory_json(html: &str) -> Result<&str> {
    let start = html
        .find(DATA_MARKER)
        .ok_or_else(|| StockError::MarkerNotFound(DATA_MARKER.to_string()))?;
    let rest = &html[start + DATA_MARKER.len()..];

    // 第一個前方以 "};" 結尾的 allStores 宣告
    let mut offset = 0;
    while let Some(pos) = rest[offset..].find(NEXT_MARKER) {
        let candidate = rest[..offset + pos].trim_end();
        if let Some(body) = candidate.strip_suffix(';') {
            let body = body.trim();
            if body.starts_with('{') && body.ends_with('}') {
                return Ok(body);
            }
        }
        offset += pos + NEXT_MARKER.len();
    }

    Err(StockError::MarkerNotFound(format!(
        "{} ... }}; {}",
        DATA_MARKER, NEXT_MARKER
    )))
}

/// 由儀表板 HTML 解析庫存快照
pub fn extract_snapshot(html: &str) -> Result<InventorySnapshot> {
    let json = extract_inventory_json(html)?;
    tracing::debug!("取出內嵌庫存 JSON {} 位元組", json.len());
    InventorySnapshot::from_json_str(json)
}
