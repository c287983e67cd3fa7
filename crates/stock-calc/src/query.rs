//! 庫存查詢：SKU 搜尋、門市摘要、地區庫存、整體統計

use serde::Serialize;
use std::collections::BTreeMap;

use stock_core::{Area, InventorySnapshot, ItemType};

use crate::classifier::StoreClassifier;
use crate::export::gender_key;

/// 地區查詢的最大筆數
pub const AREA_RESULT_LIMIT: usize = 50;

/// 低庫存門檻（總庫存小於此值）
pub const LOW_STOCK_BELOW: i64 = 10;

/// 高庫存門檻（總庫存大於此值）
pub const HIGH_STOCK_ABOVE: i64 = 100;

/// 據點庫存
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreQty {
    pub store: String,
    pub qty: i64,
}

/// SKU 搜尋結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkuMatch {
    pub entity: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub sku: String,
    pub name: String,
    pub gender: String,
    pub series: String,
    pub size: String,
    pub tier: String,
    pub total: i64,

    /// 依數量降序
    pub stores: Vec<StoreQty>,
}

/// 門市摘要中的品項
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreItem {
    pub sku: String,
    pub name: String,
    pub size: String,
    pub qty: i64,
}

/// 門市摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary {
    pub store: String,
    pub total_sku: usize,
    pub total_stock: i64,
    pub items: Vec<StoreItem>,
}

/// 地區庫存列
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaStock {
    pub entity: String,
    pub sku: String,
    pub name: String,
    pub store: String,
    pub qty: i64,
}

/// 實體庫存合計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityTotals {
    pub retail: i64,
    pub warehouse: i64,
}

/// 整體統計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_sku: usize,
    pub total_stock: i64,
    pub by_entity: BTreeMap<String, EntityTotals>,
    pub by_gender: BTreeMap<String, i64>,
    pub low_stock: usize,
    pub out_of_stock: usize,
    pub high_stock: usize,
}

/// 庫存查詢
pub struct InventoryQuery<'a> {
    snapshot: &'a InventorySnapshot,
    classifier: &'a StoreClassifier,
}

impl<'a> InventoryQuery<'a> {
    pub fn new(snapshot: &'a InventorySnapshot, classifier: &'a StoreClassifier) -> Self {
        Self {
            snapshot,
            classifier,
        }
    }

    /// 以 SKU 或商品代碼搜尋（不分大小寫，部分比對）
    ///
    /// 只返回至少有一個正庫存據點的品項。
    pub fn search_sku(&self, term: &str) -> Vec<SkuMatch> {
        let term = term.trim().to_lowercase();
        let mut results = Vec::new();

        for (entity, inventory) in self.snapshot.iter() {
            for (item_type, item) in inventory.all_items() {
                let matched = item.sku.to_lowercase().contains(&term)
                    || item.product_code().to_lowercase().contains(&term);
                if !matched {
                    continue;
                }

                let mut stores: Vec<StoreQty> = item
                    .positive_stock()
                    .map(|(store, qty)| StoreQty {
                        store: store.to_string(),
                        qty,
                    })
                    .collect();
                if stores.is_empty() {
                    continue;
                }
                stores.sort_by(|a, b| b.qty.cmp(&a.qty));

                results.push(SkuMatch {
                    entity: entity.to_string(),
                    item_type,
                    sku: item.sku.clone(),
                    name: item.name.clone(),
                    gender: item.gender.clone(),
                    series: item.series.clone(),
                    size: item.size.clone(),
                    tier: item.tier.clone(),
                    total: item.total,
                    stores,
                });
            }
        }

        tracing::debug!("SKU 搜尋 \"{}\"：{} 筆", term, results.len());
        results
    }

    /// 門市摘要：據點名稱包含查詢字串、且數量非零的所有品項
    pub fn store_summary(&self, store_name: &str) -> StoreSummary {
        let term = store_name.trim().to_lowercase();
        let mut items = Vec::new();

        for (_, inventory) in self.snapshot.iter() {
            for (_, item) in inventory.all_items() {
                for (store, &qty) in &item.store_stock {
                    if qty != 0 && store.to_lowercase().contains(&term) {
                        items.push(StoreItem {
                            sku: item.sku.clone(),
                            name: item.name.clone(),
                            size: item.size.clone(),
                            qty,
                        });
                    }
                }
            }
        }

        items.sort_by(|a, b| b.qty.cmp(&a.qty));

        StoreSummary {
            store: store_name.to_string(),
            total_sku: items.len(),
            total_stock: items.iter().map(|i| i.qty).sum(),
            items,
        }
    }

    /// 地區庫存：據點歸屬於指定地區的正庫存（倉庫據點依其倉庫所在地區）
    pub fn stock_by_area(&self, area: Area, item_type: ItemType, limit: usize) -> Vec<AreaStock> {
        let mut results = Vec::new();

        'entities: for (entity, inventory) in self.snapshot.iter() {
            for item in inventory.items(item_type) {
                for (store, qty) in item.positive_stock() {
                    if self.classifier.location_area(store) != area {
                        continue;
                    }
                    results.push(AreaStock {
                        entity: entity.to_string(),
                        sku: item.sku.clone(),
                        name: item.name.clone(),
                        store: store.to_string(),
                        qty,
                    });
                    if results.len() >= limit {
                        break 'entities;
                    }
                }
            }
        }

        results
    }

    /// 整體統計（SKU 數與庫存狀態只計門市品項）
    pub fn stats(&self) -> InventoryStats {
        let mut stats = InventoryStats::default();

        for (entity, inventory) in self.snapshot.iter() {
            let totals = stats.by_entity.entry(entity.to_string()).or_default();

            for item in &inventory.retail {
                stats.total_sku += 1;
                stats.total_stock += item.total;
                totals.retail += item.total;
                *stats.by_gender.entry(gender_key(&item.gender)).or_insert(0) += item.total;

                match item.total {
                    0 => stats.out_of_stock += 1,
                    t if t < LOW_STOCK_BELOW => stats.low_stock += 1,
                    t if t > HIGH_STOCK_ABOVE => stats.high_stock += 1,
                    _ => {}
                }
            }

            totals.warehouse += inventory.warehouse.iter().map(|item| item.total).sum::<i64>();
        }

        stats
    }
}
