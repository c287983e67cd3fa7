//! 門市庫存控管（庫存天數）
//!
//! 將單一實體的門市庫存與 (SKU, 門市) 銷售彙總對接，
//! 逐一計算庫存天數與狀態，並依門市彙總。

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use stock_core::{Area, EntityInventory, StockStatus, WarehouseCode};

use crate::aggregation::{DateRange, SalesAggregate};
use crate::classifier::StoreClassifier;
use crate::metrics::{
    daily_rate, days_of_stock_from_sales, round_half_up, stock_status, DAYS_PER_MONTH,
};

/// SKU × 門市 控管列
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuControlRow {
    pub sku: String,
    pub name: String,
    pub gender: String,
    pub series: String,
    pub tier: String,
    pub store: String,
    pub area: Area,
    pub warehouse: Option<WarehouseCode>,
    pub current_stock: i64,

    /// 日銷量（小數兩位）
    #[serde(with = "rust_decimal::serde::float")]
    pub daily_rate: Decimal,

    /// 月銷量（小數一位）
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_rate: Decimal,

    pub dos: i64,
    pub status: StockStatus,
}

/// 門市彙總控管列
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreControlRow {
    pub store: String,
    pub area: Area,
    pub warehouse: Option<WarehouseCode>,
    pub total_stock: i64,
    pub total_sku: usize,

    /// 各列銷量合計
    pub total_qty: i64,

    #[serde(with = "rust_decimal::serde::float")]
    pub total_daily_rate: Decimal,

    pub critical: u32,
    pub warning: u32,
    pub ok: u32,
    pub overstock: u32,

    /// 總庫存 / 總日銷量；無銷售時為 999
    pub avg_dos: i64,
    pub status: StockStatus,
}

impl StoreControlRow {
    fn new(store: &str, area: Area, warehouse: Option<WarehouseCode>) -> Self {
        Self {
            store: store.to_string(),
            area,
            warehouse,
            total_stock: 0,
            total_sku: 0,
            total_qty: 0,
            total_daily_rate: Decimal::ZERO,
            critical: 0,
            warning: 0,
            ok: 0,
            overstock: 0,
            avg_dos: 0,
            status: StockStatus::Overstock,
        }
    }

    fn count(&mut self, status: StockStatus) {
        match status {
            StockStatus::Critical => self.critical += 1,
            StockStatus::Warning => self.warning += 1,
            StockStatus::Ok => self.ok += 1,
            StockStatus::Overstock => self.overstock += 1,
        }
    }
}

/// 庫存控管結果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockControlResult {
    /// 銷售資料期間
    pub sales_period: Option<DateRange>,

    /// 依平均庫存天數升序
    pub store_control: Vec<StoreControlRow>,

    /// 依庫存天數升序
    pub sku_control: Vec<SkuControlRow>,
}

impl StockControlResult {
    /// 有補貨倉庫的 CRITICAL 品項（需補貨清單）
    pub fn critical_with_warehouse(&self, limit: usize) -> Vec<&SkuControlRow> {
        self.sku_control
            .iter()
            .filter(|row| row.status == StockStatus::Critical && row.warehouse.is_some())
            .take(limit)
            .collect()
    }

    /// 各狀態的 SKU 數量
    pub fn status_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for row in &self.sku_control {
            *counts.entry(row.status.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

/// 庫存控管計算器
pub struct StockControlCalculator<'a> {
    classifier: &'a StoreClassifier,
}

impl<'a> StockControlCalculator<'a> {
    pub fn new(classifier: &'a StoreClassifier) -> Self {
        Self { classifier }
    }

    /// 計算單一實體的門市庫存控管
    ///
    /// 只處理正庫存；查無銷售的 (SKU, 門市) 銷量視為 0。
    /// 庫存天數以 庫存 × 天數 / 銷量 的分數直接取整。
    pub fn calculate(&self, inventory: &EntityInventory, sales: &SalesAggregate) -> StockControlResult {
        let quantities = sales.qty_index();
        let days = sales.days();
        let mut classifications = HashMap::new();

        let mut sku_control = Vec::new();
        let mut stores: BTreeMap<String, StoreControlRow> = BTreeMap::new();

        for item in &inventory.retail {
            let sku_key = item.sku.to_lowercase();

            for (store, current_stock) in item.positive_stock() {
                let total_qty = quantities
                    .get(&(sku_key.clone(), store.to_lowercase()))
                    .copied()
                    .unwrap_or(0);
                let rate = daily_rate(total_qty, days);

                let dos = days_of_stock_from_sales(current_stock, total_qty, days);
                let status = stock_status(dos);

                let classification = *classifications
                    .entry(store)
                    .or_insert_with(|| self.classifier.classify(store));

                sku_control.push(SkuControlRow {
                    sku: item.sku.clone(),
                    name: item.name.clone(),
                    gender: item.gender.clone(),
                    series: item.series.clone(),
                    tier: item.tier.clone(),
                    store: store.to_string(),
                    area: classification.area,
                    warehouse: classification.warehouse,
                    current_stock,
                    daily_rate: round_half_up(rate, 2),
                    monthly_rate: round_half_up(rate * Decimal::from(DAYS_PER_MONTH), 1),
                    dos,
                    status,
                });

                let row = stores.entry(store.to_string()).or_insert_with(|| {
                    StoreControlRow::new(store, classification.area, classification.warehouse)
                });
                row.total_stock += current_stock;
                row.total_sku += 1;
                row.total_qty += total_qty;
                row.count(status);
            }
        }

        let mut store_control: Vec<StoreControlRow> = stores
            .into_values()
            .map(|mut row| {
                row.avg_dos = days_of_stock_from_sales(row.total_stock, row.total_qty, days);
                row.status = stock_status(row.avg_dos);
                row.total_daily_rate = round_half_up(daily_rate(row.total_qty, days), 2);
                row
            })
            .collect();

        store_control.sort_by_key(|row| row.avg_dos);
        sku_control.sort_by_key(|row| row.dos);

        tracing::info!(
            "庫存控管完成：門市 {} 間，SKU×門市 {} 組",
            store_control.len(),
            sku_control.len()
        );

        StockControlResult {
            sales_period: sales.date_range,
            store_control,
            sku_control,
        }
    }
}
