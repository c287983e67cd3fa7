//! 銷售彙總
//!
//! - 依 (SKU, 門市) 彙總數量、交易筆數與日銷量
//! - 依門市彙總
//! - 依 (商品代碼, 月份[, 地區]) 彙總

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use stock_core::{Area, SalesRecord, WarehouseCode};

use crate::classifier::StoreClassifier;
use crate::metrics::{daily_rate, DAYS_PER_MONTH};

/// 銷售日期區間（含頭尾兩天）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// 天數 = (end - start) + 1
    pub days: i64,
}

impl DateRange {
    /// 創建日期區間（起訖顛倒時自動交換）
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        Self {
            start,
            end,
            days: (end - start).num_days() + 1,
        }
    }

    /// 由日期集合求區間；無日期時返回 None
    pub fn from_dates<I>(dates: I) -> Option<Self>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut iter = dates.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), d| (min.min(d), max.max(d)));
        Some(Self::new(min, max))
    }

    /// 檢查日期是否在區間內
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// (SKU, 門市) 銷售彙總
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuStoreSales {
    pub sku: String,
    pub store: String,
    pub product_name: String,
    pub area: Area,
    pub warehouse: Option<WarehouseCode>,
    pub total_qty: i64,
    pub transactions: u32,
    /// 日銷量 = 總數量 / 區間天數
    #[serde(with = "rust_decimal::serde::float")]
    pub daily_rate: Decimal,
    /// 月銷量 = 日銷量 × 30
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_rate: Decimal,
}

/// 門市銷售彙總
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSales {
    pub store: String,
    pub area: Area,
    pub warehouse: Option<WarehouseCode>,
    pub total_qty: i64,
    /// 不重複 SKU 數
    pub total_sku: usize,
    pub transactions: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub daily_rate: Decimal,
}

/// SKU 總銷量（跨門市）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuTotal {
    pub sku: String,
    pub name: String,
    pub total_qty: i64,
}

/// 銷售彙總結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesAggregate {
    /// 銷售日期區間（無有效紀錄時為 None）
    pub date_range: Option<DateRange>,

    /// 參與彙總的商品銷售筆數
    pub total_transactions: usize,

    pub sales_by_sku_store: Vec<SkuStoreSales>,

    pub sales_by_store: Vec<StoreSales>,
}

impl SalesAggregate {
    /// 查詢 (SKU, 門市) 彙總（不分大小寫）
    pub fn find(&self, sku: &str, store: &str) -> Option<&SkuStoreSales> {
        let sku = sku.to_lowercase();
        let store = store.to_lowercase();
        self.sales_by_sku_store
            .iter()
            .find(|s| s.sku.to_lowercase() == sku && s.store.to_lowercase() == store)
    }

    /// 區間天數；無有效紀錄時為 0
    pub fn days(&self) -> i64 {
        self.date_range.map(|range| range.days).unwrap_or(0)
    }

    /// 建立總銷量索引，鍵為小寫的 (SKU, 門市)
    pub fn qty_index(&self) -> HashMap<(String, String), i64> {
        self.sales_by_sku_store
            .iter()
            .map(|s| ((s.sku.to_lowercase(), s.store.to_lowercase()), s.total_qty))
            .collect()
    }

    /// 銷量最高的門市
    pub fn top_stores(&self, limit: usize) -> Vec<&StoreSales> {
        let mut stores: Vec<&StoreSales> = self.sales_by_store.iter().collect();
        stores.sort_by(|a, b| b.total_qty.cmp(&a.total_qty));
        stores.truncate(limit);
        stores
    }

    /// 銷量最高的 SKU（跨門市合計）
    pub fn top_skus(&self, limit: usize) -> Vec<SkuTotal> {
        let mut totals: BTreeMap<&str, SkuTotal> = BTreeMap::new();
        for item in &self.sales_by_sku_store {
            totals
                .entry(item.sku.as_str())
                .or_insert_with(|| SkuTotal {
                    sku: item.sku.clone(),
                    name: item.product_name.clone(),
                    total_qty: 0,
                })
                .total_qty += item.total_qty;
        }

        let mut ranked: Vec<SkuTotal> = totals.into_values().collect();
        ranked.sort_by(|a, b| b.total_qty.cmp(&a.total_qty));
        ranked.truncate(limit);
        ranked
    }
}

/// 商品代碼的月銷量（含地區拆分）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMonthSales {
    pub product_code: String,

    /// 月份（YYYY-MM）→ 數量
    pub months: BTreeMap<String, i64>,

    /// 地區 → 月份 → 數量
    pub by_area: BTreeMap<Area, BTreeMap<String, i64>>,

    pub total_sales: i64,
}

impl ProductMonthSales {
    pub fn new(product_code: String) -> Self {
        Self {
            product_code,
            ..Self::default()
        }
    }

    /// 累加一筆銷售
    pub fn add(&mut self, month: &str, area: Area, qty: i64) {
        *self.months.entry(month.to_string()).or_insert(0) += qty;
        *self
            .by_area
            .entry(area)
            .or_default()
            .entry(month.to_string())
            .or_insert(0) += qty;
        self.total_sales += qty;
    }

    /// 月銷量（不分地區）
    pub fn month_total(&self, month: &str) -> i64 {
        self.months.get(month).copied().unwrap_or(0)
    }

    /// 地區月銷量
    pub fn area_month_total(&self, area: Area, month: &str) -> i64 {
        self.by_area
            .get(&area)
            .and_then(|months| months.get(month))
            .copied()
            .unwrap_or(0)
    }
}

/// 所有出現過的月份
pub fn collect_months(sales: &BTreeMap<String, ProductMonthSales>) -> BTreeSet<String> {
    sales
        .values()
        .flat_map(|s| s.months.keys().cloned())
        .collect()
}

/// 銷售彙總器
pub struct SalesAggregator<'a> {
    classifier: &'a StoreClassifier,
}

impl<'a> SalesAggregator<'a> {
    /// 創建新的彙總器
    pub fn new(classifier: &'a StoreClassifier) -> Self {
        Self { classifier }
    }

    /// 依紀錄本身的最早/最晚日期彙總
    pub fn aggregate(&self, records: &[SalesRecord]) -> SalesAggregate {
        match DateRange::from_dates(records.iter().map(|r| r.date)) {
            Some(range) => self.aggregate_in_range(records, range),
            None => SalesAggregate::default(),
        }
    }

    /// 依指定區間彙總（區間外的紀錄不計）
    pub fn aggregate_in_range(&self, records: &[SalesRecord], range: DateRange) -> SalesAggregate {
        tracing::info!(
            "開始銷售彙總：{} 筆，區間 {} ~ {}（{} 天）",
            records.len(),
            range.start,
            range.end,
            range.days
        );

        let mut by_sku_store: BTreeMap<(String, String), SkuStoreSales> = BTreeMap::new();
        let mut by_store: BTreeMap<String, (StoreSales, BTreeSet<String>)> = BTreeMap::new();
        let mut total_transactions = 0;

        for record in records.iter().filter(|r| range.contains(r.date)) {
            total_transactions += 1;
            let classification = self.classifier.classify(&record.store);

            let entry = by_sku_store
                .entry((record.sku.clone(), record.store.clone()))
                .or_insert_with(|| SkuStoreSales {
                    sku: record.sku.clone(),
                    store: record.store.clone(),
                    product_name: record.product_name.clone(),
                    area: classification.area,
                    warehouse: classification.warehouse,
                    total_qty: 0,
                    transactions: 0,
                    daily_rate: Decimal::ZERO,
                    monthly_rate: Decimal::ZERO,
                });
            entry.total_qty += record.quantity;
            entry.transactions += 1;

            let (store_entry, skus) = by_store.entry(record.store.clone()).or_insert_with(|| {
                (
                    StoreSales {
                        store: record.store.clone(),
                        area: classification.area,
                        warehouse: classification.warehouse,
                        total_qty: 0,
                        total_sku: 0,
                        transactions: 0,
                        daily_rate: Decimal::ZERO,
                    },
                    BTreeSet::new(),
                )
            });
            store_entry.total_qty += record.quantity;
            store_entry.transactions += 1;
            skus.insert(record.sku.clone());
        }

        let sales_by_sku_store: Vec<SkuStoreSales> = by_sku_store
            .into_values()
            .map(|mut item| {
                item.daily_rate = daily_rate(item.total_qty, range.days);
                item.monthly_rate = item.daily_rate * Decimal::from(DAYS_PER_MONTH);
                item
            })
            .collect();

        let sales_by_store: Vec<StoreSales> = by_store
            .into_values()
            .map(|(mut store, skus)| {
                store.total_sku = skus.len();
                store.daily_rate = daily_rate(store.total_qty, range.days);
                store
            })
            .collect();

        tracing::debug!(
            "彙總完成：SKU×門市 {} 組，門市 {} 間",
            sales_by_sku_store.len(),
            sales_by_store.len()
        );

        SalesAggregate {
            date_range: Some(range),
            total_transactions,
            sales_by_sku_store,
            sales_by_store,
        }
    }

    /// 依 (商品代碼, 月份) 彙總，並在各地區下拆分月銷量
    pub fn by_product_month(&self, records: &[SalesRecord]) -> BTreeMap<String, ProductMonthSales> {
        let mut grouped: BTreeMap<String, ProductMonthSales> = BTreeMap::new();
        let mut area_cache: HashMap<&str, Area> = HashMap::new();

        for record in records {
            let area = *area_cache
                .entry(record.store.as_str())
                .or_insert_with(|| self.classifier.area_for(&record.store));

            let code = record.product_code();
            grouped
                .entry(code.to_string())
                .or_insert_with(|| ProductMonthSales::new(code.to_string()))
                .add(&record.month(), area, record.quantity);
        }

        tracing::info!("商品代碼數量: {}", grouped.len());
        grouped
    }
}
