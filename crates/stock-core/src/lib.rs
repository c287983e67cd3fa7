//! # Stock Core
//!
//! 零售庫存健康度核心資料模型與類型定義

pub mod classification;
pub mod config;
pub mod inventory;
pub mod product;
pub mod sales;

// Re-export 主要類型
pub use classification::{Area, StockStatus, StoreClassification, WarehouseCode};
pub use config::{AreaRule, ClassifierConfig, WarehousePattern};
pub use inventory::{EntityInventory, InventoryItem, InventorySnapshot, ItemType};
pub use product::{article_name, product_code};
pub use sales::{is_packaging_sku, SalesRecord, PACKAGING_MARKERS};

/// 庫存工具錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum StockError {
    #[error("檔案讀取失敗: {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV 解析錯誤: {0}")]
    Csv(String),

    #[error("找不到庫存資料標記: {0}")]
    MarkerNotFound(String),

    #[error("JSON 解析錯誤: {0}")]
    Json(String),

    #[error("分類設定錯誤: {0}")]
    InvalidConfig(String),

    #[error("其他錯誤: {0}")]
    Other(String),
}

impl StockError {
    /// 包裝 I/O 錯誤並附上檔案路徑
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for StockError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StockError>;
