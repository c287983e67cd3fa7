//! # Stock IO
//!
//! 檔案輸入輸出：銷售 CSV、庫存快照（JSON / 舊版儀表板 HTML）、分類表、
//! JSON 報表與終端表格

pub mod config;
pub mod inventory_source;
pub mod legacy_html;
pub mod report;
pub mod sales_csv;
pub mod table;

pub use config::{load_classifier, load_classifier_config, DEFAULT_CLASSIFIER_PATH};
pub use inventory_source::{load_inventory, InventoryFormat};
pub use report::{read_report, write_report, Report};
pub use sales_csv::{load_sales, parse_sales, SalesLoad};
