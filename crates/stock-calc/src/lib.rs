//! # Stock Calculation Engine
//!
//! 庫存健康度計算引擎：門市分類、銷售彙總、庫存天數、週轉率、庫存匯出與查詢

pub mod aggregation;
pub mod classifier;
pub mod export;
pub mod metrics;
pub mod query;
pub mod stock_control;
pub mod turnover;

// Re-export 主要類型
pub use aggregation::{DateRange, ProductMonthSales, SalesAggregate, SalesAggregator};
pub use classifier::StoreClassifier;
pub use export::{InventoryExport, InventoryExporter};
pub use metrics::{
    days_of_stock, days_of_stock_from_sales, stock_status, TurnoverRatios, NO_SALES_DOS,
};
pub use query::InventoryQuery;
pub use stock_control::{StockControlCalculator, StockControlResult};
pub use turnover::{TurnoverCalculator, TurnoverReport};
