//! 庫存匯出（單一實體的 SKU 清單與統計）

use serde::Serialize;
use std::collections::BTreeMap;

use stock_core::{Area, EntityInventory};

use crate::classifier::StoreClassifier;

/// 匯出統計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStats {
    pub total_sku: usize,
    pub total_retail_stock: i64,
    pub total_warehouse_stock: i64,
}

/// 匯出的 SKU 列
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkuEntry {
    pub sku: String,
    pub kode: String,
    pub name: String,
    pub gender: String,
    pub series: String,
    pub size: String,
    pub tier: String,
    pub total: i64,

    /// 正庫存的門市
    pub stores: BTreeMap<String, i64>,
}

/// 完整匯出內容
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryExport {
    pub stats: ExportStats,
    pub by_gender: BTreeMap<String, i64>,
    pub by_area: BTreeMap<Area, i64>,

    /// 依總庫存降序
    pub sku_list: Vec<SkuEntry>,
}

/// 精簡摘要（只保留前 N 個 SKU）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary<'a> {
    pub stats: ExportStats,
    pub by_gender: &'a BTreeMap<String, i64>,
    pub by_area: &'a BTreeMap<Area, i64>,
    pub top_sku: &'a [SkuEntry],
}

impl InventoryExport {
    pub fn summary(&self, top: usize) -> InventorySummary<'_> {
        InventorySummary {
            stats: self.stats,
            by_gender: &self.by_gender,
            by_area: &self.by_area,
            top_sku: &self.sku_list[..top.min(self.sku_list.len())],
        }
    }
}

/// 缺少性別分類時的歸類
pub const UNKNOWN_GENDER: &str = "OTHER";

pub(crate) fn gender_key(gender: &str) -> String {
    let gender = gender.trim();
    if gender.is_empty() {
        UNKNOWN_GENDER.to_string()
    } else {
        gender.to_string()
    }
}

/// 庫存匯出器
pub struct InventoryExporter<'a> {
    classifier: &'a StoreClassifier,
}

impl<'a> InventoryExporter<'a> {
    pub fn new(classifier: &'a StoreClassifier) -> Self {
        Self { classifier }
    }

    pub fn export(&self, inventory: &EntityInventory) -> InventoryExport {
        let mut export = InventoryExport::default();

        for item in &inventory.retail {
            export.stats.total_sku += 1;
            export.stats.total_retail_stock += item.total;
            *export.by_gender.entry(gender_key(&item.gender)).or_insert(0) += item.total;

            let mut stores = BTreeMap::new();
            for (store, qty) in item.positive_stock() {
                *export
                    .by_area
                    .entry(self.classifier.area_for(store))
                    .or_insert(0) += qty;
                stores.insert(store.to_string(), qty);
            }

            export.sku_list.push(SkuEntry {
                sku: item.sku.clone(),
                kode: item.kode_kecil.clone(),
                name: item.name.clone(),
                gender: item.gender.clone(),
                series: item.series.clone(),
                size: item.size.clone(),
                tier: item.tier.clone(),
                total: item.total,
                stores,
            });
        }

        export.stats.total_warehouse_stock = inventory.warehouse.iter().map(|item| item.total).sum();
        export.sku_list.sort_by(|a, b| b.total.cmp(&a.total));

        tracing::info!(
            "匯出 SKU {} 筆，門市庫存 {}，倉庫庫存 {}",
            export.stats.total_sku,
            export.stats.total_retail_stock,
            export.stats.total_warehouse_stock
        );

        export
    }
}
