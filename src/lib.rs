//! # Stock
//!
//! 零售庫存健康度工具：批次報表（`stock-report`）與庫存查詢（`stock-query`）

pub mod logging;
pub mod query;
pub mod report;

pub use query::QueryCli;
pub use report::ReportCli;
