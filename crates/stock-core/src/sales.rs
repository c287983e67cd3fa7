//! 銷售紀錄模型

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::product::product_code;

/// 非商品（包材）SKU 標記，不分大小寫
pub const PACKAGING_MARKERS: [&str; 4] = ["SHOPBAG", "PAPERBAG", "INBOX", "BOX"];

/// 檢查 SKU 是否為包材（購物袋、紙袋、鞋盒）
pub fn is_packaging_sku(sku: &str) -> bool {
    let upper = sku.to_uppercase();
    PACKAGING_MARKERS.iter().any(|marker| upper.contains(marker))
}

/// 銷售紀錄（一筆 CSV 明細）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    /// SKU（含尺寸）
    pub sku: String,

    /// 門市名稱
    pub store: String,

    /// 訂單日期
    pub date: NaiveDate,

    /// 銷售數量（> 0）
    pub quantity: i64,

    /// 商品名稱
    pub product_name: String,
}

impl SalesRecord {
    /// 創建新的銷售紀錄
    pub fn new(sku: String, store: String, date: NaiveDate, quantity: i64) -> Self {
        Self {
            sku,
            store,
            date,
            quantity,
            product_name: String::new(),
        }
    }

    /// 建構器模式：設置商品名稱
    pub fn with_product_name(mut self, product_name: String) -> Self {
        self.product_name = product_name;
        self
    }

    /// 商品代碼（去除尺寸後綴）
    pub fn product_code(&self) -> &str {
        product_code(&self.sku)
    }

    /// 年月鍵（YYYY-MM）
    pub fn month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    /// 檢查是否為有效的商品銷售
    pub fn is_valid(&self) -> bool {
        !self.sku.is_empty()
            && !self.store.is_empty()
            && self.quantity > 0
            && !is_packaging_sku(&self.sku)
    }
}
