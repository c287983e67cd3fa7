//! 商品代碼層級的週轉分析
//!
//! 以商品代碼（kode kecil）為單位，結合近三個月銷量（含地區拆分）、
//! 倉庫庫存與門市庫存，計算 TW（倉庫庫存 / 月均銷量）與 TO（全部庫存 / 月均銷量）。

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use stock_core::{Area, InventoryItem, InventorySnapshot, WarehouseCode};

use crate::aggregation::{collect_months, ProductMonthSales};
use crate::classifier::StoreClassifier;
use crate::metrics::{average_monthly_sales, last_months, TurnoverRatios, MONTH_WINDOW};

/// 印尼文月份名稱
const MONTH_NAMES_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// "YYYY-MM" → 印尼文月份名稱
pub fn month_name(month: &str) -> Option<&'static str> {
    let (_, mm) = month.split_once('-')?;
    let index: usize = mm.parse().ok()?;
    index.checked_sub(1).and_then(|i| MONTH_NAMES_ID.get(i)).copied()
}

/// 地區近三個月銷量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AreaSales {
    pub m1: i64,
    pub m2: i64,
    pub m3: i64,
    pub avg: i64,
}

impl AreaSales {
    fn from_window(window: [i64; MONTH_WINDOW]) -> Self {
        Self {
            m1: window[0],
            m2: window[1],
            m3: window[2],
            avg: average_monthly_sales(&window),
        }
    }
}

/// 週轉分析品項
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnoverItem {
    pub kode_kecil: String,
    pub article: String,
    pub series: String,
    pub gender: String,
    pub tier: String,

    pub sales_m1: i64,
    pub sales_m2: i64,
    pub sales_m3: i64,
    pub avg_sales: i64,
    pub sales_by_area: BTreeMap<Area, AreaSales>,

    #[serde(rename = "WHS")]
    pub whs: i64,
    #[serde(rename = "WHB")]
    pub whb: i64,
    #[serde(rename = "WHJ")]
    pub whj: i64,
    pub wh_total: i64,

    /// 門市庫存（不含倉庫據點）
    pub stok_toko: i64,
    pub stok_toko_by_area: BTreeMap<Area, i64>,

    pub global_stock: i64,

    /// 倉庫週轉（月）
    #[serde(with = "rust_decimal::serde::float_option")]
    pub tw: Option<Decimal>,

    /// 整體週轉（月）
    #[serde(with = "rust_decimal::serde::float_option")]
    pub to: Option<Decimal>,
}

impl TurnoverItem {
    pub fn warehouse_stock(&self, code: WarehouseCode) -> i64 {
        match code {
            WarehouseCode::WHB => self.whb,
            WarehouseCode::WHJ => self.whj,
            WarehouseCode::WHS => self.whs,
        }
    }
}

/// 銷售期間
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesPeriod {
    pub months: Vec<String>,
    pub month_names: Vec<String>,
}

/// 各倉庫庫存合計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WarehouseSummary {
    #[serde(rename = "WHB")]
    pub whb: i64,
    #[serde(rename = "WHJ")]
    pub whj: i64,
    #[serde(rename = "WHS")]
    pub whs: i64,
}

/// 門市庫存合計（各地區 + 總計）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStockSummary {
    #[serde(flatten)]
    pub by_area: BTreeMap<Area, i64>,

    #[serde(rename = "TOTAL")]
    pub total: i64,
}

/// 週轉分析報表
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnoverReport {
    pub sales_period: SalesPeriod,
    pub warehouse_summary: WarehouseSummary,
    pub stok_toko_summary: StoreStockSummary,
    pub total_global_stock: i64,

    /// 依月均銷量降序
    pub items: Vec<TurnoverItem>,
}

/// 商品代碼的庫存彙總
#[derive(Debug, Clone, Default)]
struct ProductStock {
    article: String,
    gender: String,
    series: String,
    tier: String,
    stok_toko: i64,
    stok_toko_by_area: BTreeMap<Area, i64>,
    warehouses: BTreeMap<WarehouseCode, i64>,
}

impl ProductStock {
    /// 描述欄位以第一個非空值為準
    fn describe(&mut self, item: &InventoryItem) {
        fill(&mut self.article, item.article());
        fill(&mut self.gender, item.gender.trim().to_string());
        fill(&mut self.series, item.series.trim().to_string());
        fill(&mut self.tier, item.tier.trim().to_string());
    }

    fn warehouse(&self, code: WarehouseCode) -> i64 {
        self.warehouses.get(&code).copied().unwrap_or(0)
    }
}

fn fill(slot: &mut String, value: String) {
    if slot.is_empty() && !value.is_empty() {
        *slot = value;
    }
}

/// 週轉分析計算器
pub struct TurnoverCalculator<'a> {
    classifier: &'a StoreClassifier,
}

impl<'a> TurnoverCalculator<'a> {
    pub fn new(classifier: &'a StoreClassifier) -> Self {
        Self { classifier }
    }

    /// 計算週轉分析
    ///
    /// `entities` 為空時處理快照中的所有實體。
    pub fn calculate(
        &self,
        sales: &BTreeMap<String, ProductMonthSales>,
        snapshot: &InventorySnapshot,
        entities: &[String],
    ) -> TurnoverReport {
        let stock = self.aggregate_stock(snapshot, entities);

        let months = last_months(collect_months(sales).iter(), MONTH_WINDOW);
        tracing::info!("週轉分析使用月份: {}", months.join(", "));

        let codes: BTreeSet<&String> = sales.keys().chain(stock.keys()).collect();
        let empty_sales = ProductMonthSales::default();
        let empty_stock = ProductStock::default();

        let mut items: Vec<TurnoverItem> = codes
            .into_iter()
            .map(|code| {
                let product_sales = sales.get(code).unwrap_or(&empty_sales);
                let product_stock = stock.get(code).unwrap_or(&empty_stock);
                self.build_item(code, product_sales, product_stock, &months)
            })
            .collect();

        items.sort_by(|a, b| b.avg_sales.cmp(&a.avg_sales));

        let report = summarize(items, &months);
        tracing::info!(
            "週轉分析完成：{} 個商品代碼，全部庫存 {}",
            report.items.len(),
            report.total_global_stock
        );
        report
    }

    /// 依商品代碼彙總門市庫存（依地區）與倉庫庫存（依倉庫代碼）
    fn aggregate_stock(
        &self,
        snapshot: &InventorySnapshot,
        entities: &[String],
    ) -> BTreeMap<String, ProductStock> {
        let selected: Vec<&str> = if entities.is_empty() {
            snapshot.iter().map(|(name, _)| name).collect()
        } else {
            entities.iter().map(String::as_str).collect()
        };

        let mut stock: BTreeMap<String, ProductStock> = BTreeMap::new();

        for name in selected {
            let Some(entity) = snapshot.entity(name) else {
                tracing::warn!("庫存快照中找不到實體: {}", name);
                continue;
            };

            for item in &entity.retail {
                let entry = stock.entry(item.product_code().to_string()).or_default();
                entry.describe(item);

                for (store, qty) in item.positive_stock() {
                    if store.to_lowercase().contains("warehouse") {
                        continue;
                    }
                    entry.stok_toko += qty;
                    *entry
                        .stok_toko_by_area
                        .entry(self.classifier.area_for(store))
                        .or_insert(0) += qty;
                }
            }

            for item in &entity.warehouse {
                let entry = stock.entry(item.product_code().to_string()).or_default();
                entry.describe(item);

                for (location, qty) in item.positive_stock() {
                    match self.classifier.warehouse_location_code(location) {
                        Some(code) => *entry.warehouses.entry(code).or_insert(0) += qty,
                        None => tracing::debug!("未知倉庫據點: {}", location),
                    }
                }
            }

            tracing::debug!(
                "實體 {}：門市品項 {}，倉庫品項 {}",
                name,
                entity.retail.len(),
                entity.warehouse.len()
            );
        }

        stock
    }

    fn build_item(
        &self,
        code: &str,
        sales: &ProductMonthSales,
        stock: &ProductStock,
        months: &[String],
    ) -> TurnoverItem {
        let totals = month_window(months, |month| sales.month_total(month));
        let avg_sales = average_monthly_sales(&totals);

        let sales_by_area = Area::ALL
            .iter()
            .map(|&area| {
                let window = month_window(months, |month| sales.area_month_total(area, month));
                (area, AreaSales::from_window(window))
            })
            .collect();

        let stok_toko_by_area = Area::ALL
            .iter()
            .map(|&area| (area, stock.stok_toko_by_area.get(&area).copied().unwrap_or(0)))
            .collect();

        let whb = stock.warehouse(WarehouseCode::WHB);
        let whj = stock.warehouse(WarehouseCode::WHJ);
        let whs = stock.warehouse(WarehouseCode::WHS);
        let wh_total = whb + whj + whs;
        let global_stock = stock.stok_toko + wh_total;

        let ratios = TurnoverRatios::calculate(wh_total, global_stock, avg_sales);

        TurnoverItem {
            kode_kecil: code.to_string(),
            article: stock.article.clone(),
            series: stock.series.clone(),
            gender: stock.gender.clone(),
            tier: stock.tier.clone(),
            sales_m1: totals[0],
            sales_m2: totals[1],
            sales_m3: totals[2],
            avg_sales,
            sales_by_area,
            whs,
            whb,
            whj,
            wh_total,
            stok_toko: stock.stok_toko,
            stok_toko_by_area,
            global_stock,
            tw: ratios.turnover_weeks,
            to: ratios.turnover_overall,
        }
    }
}

/// 依月份順序取值；月份不足時補 0
fn month_window(months: &[String], total: impl Fn(&str) -> i64) -> [i64; MONTH_WINDOW] {
    let mut values = [0; MONTH_WINDOW];
    for (slot, month) in values.iter_mut().zip(months) {
        *slot = total(month);
    }
    values
}

fn summarize(items: Vec<TurnoverItem>, months: &[String]) -> TurnoverReport {
    let mut warehouse_summary = WarehouseSummary::default();
    let mut stok_toko_summary = StoreStockSummary::default();
    let mut total_global_stock = 0;

    for item in &items {
        warehouse_summary.whb += item.whb;
        warehouse_summary.whj += item.whj;
        warehouse_summary.whs += item.whs;

        for (&area, &qty) in &item.stok_toko_by_area {
            *stok_toko_summary.by_area.entry(area).or_insert(0) += qty;
        }
        stok_toko_summary.total += item.stok_toko;
        total_global_stock += item.global_stock;
    }

    let month_names = months
        .iter()
        .map(|m| month_name(m).unwrap_or_default().to_string())
        .collect();

    TurnoverReport {
        sales_period: SalesPeriod {
            months: months.to_vec(),
            month_names,
        },
        warehouse_summary,
        stok_toko_summary,
        total_global_stock,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::SalesAggregator;
    use crate::classifier::tests::test_classifier;
    use chrono::NaiveDate;
    use stock_core::{EntityInventory, SalesRecord};

    fn sale(sku: &str, store: &str, month: u32, qty: i64) -> SalesRecord {
        let date = NaiveDate::from_ymd_opt(2024, month, 15).unwrap();
        SalesRecord::new(sku.to_string(), store.to_string(), date, qty)
    }

    fn snapshot() -> InventorySnapshot {
        let ddd = EntityInventory {
            retail: vec![
                InventoryItem::new("M1SPV201Z40")
                    .with_name("SANDAL PRIA, 40")
                    .with_gender("MEN")
                    .with_stock("ZUMA Dalung", 10)
                    .with_stock("ZUMA Pluit Village", 5)
                    .with_stock("Warehouse Pluit", 7)
                    .with_stock("ZUMA Kapal", -3),
                InventoryItem::new("M1SPV201Z41").with_stock("ZUMA Lippo Batu", 5),
            ],
            warehouse: vec![InventoryItem::new("M1SPV201Z40")
                .with_stock("Warehouse Bali Gatsu - Box", 20)
                .with_stock("Warehouse Pusat", 30)
                .with_stock("Gudang Lain", 99)],
        };
        let ljbb = EntityInventory {
            retail: vec![InventoryItem::new("L1CAV201Z39").with_stock("ZUMA Kapal", 4)],
            warehouse: Vec::new(),
        };
        InventorySnapshot::new()
            .with_entity("DDD", ddd)
            .with_entity("LJBB", ljbb)
    }

    fn sales() -> BTreeMap<String, ProductMonthSales> {
        let classifier = test_classifier();
        let records = vec![
            sale("M1SPV201Z40", "ZUMA Dalung", 1, 99),
            sale("M1SPV201Z40", "ZUMA Dalung", 2, 50),
            sale("M1SPV201Z41", "ZUMA Pluit Village", 4, 100),
            sale("M1SPV201Z40", "ZUMA Dalung", 4, 0),
            sale("X9ABC001Z40", "Toko Online", 3, 6),
        ];
        SalesAggregator::new(&classifier).by_product_month(&records)
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name("2024-01"), Some("Januari"));
        assert_eq!(month_name("2024-12"), Some("Desember"));
        assert_eq!(month_name("2024-13"), None);
        assert_eq!(month_name("2024"), None);
    }

    #[test]
    fn test_turnover_item() {
        let classifier = test_classifier();
        let report = TurnoverCalculator::new(&classifier).calculate(&sales(), &snapshot(), &[]);

        // 近三個月：2024-02, 2024-03, 2024-04
        assert_eq!(report.sales_period.months, vec!["2024-02", "2024-03", "2024-04"]);
        assert_eq!(report.sales_period.month_names, vec!["Februari", "Maret", "April"]);

        let item = report
            .items
            .iter()
            .find(|i| i.kode_kecil == "M1SPV201")
            .unwrap();

        assert_eq!(item.article, "SANDAL PRIA");
        assert_eq!(item.gender, "MEN");
        assert_eq!((item.sales_m1, item.sales_m2, item.sales_m3), (50, 0, 100));
        assert_eq!(item.avg_sales, 50);

        let bali = item.sales_by_area[&Area::Bali];
        assert_eq!((bali.m1, bali.m2, bali.m3, bali.avg), (50, 0, 0, 17));
        assert_eq!(item.sales_by_area[&Area::Jakarta].m3, 100);

        // 倉庫據點不計入門市庫存，負庫存忽略
        assert_eq!(item.stok_toko, 20);
        assert_eq!(item.stok_toko_by_area[&Area::Bali], 10);
        assert_eq!(item.stok_toko_by_area[&Area::Jakarta], 5);
        assert_eq!(item.stok_toko_by_area[&Area::JawaTimur], 5);

        assert_eq!((item.whb, item.whj, item.whs), (20, 0, 30));
        assert_eq!(item.wh_total, 50);
        assert_eq!(item.global_stock, 70);
        assert_eq!(item.tw, Some(Decimal::from(1)));
        assert_eq!(item.to, Some(Decimal::new(14, 1)));
    }

    #[test]
    fn test_items_sorted_and_summarized() {
        let classifier = test_classifier();
        let report = TurnoverCalculator::new(&classifier).calculate(&sales(), &snapshot(), &[]);

        let avg: Vec<i64> = report.items.iter().map(|i| i.avg_sales).collect();
        assert!(avg.windows(2).all(|w| w[0] >= w[1]));

        // 只有庫存、無銷售
        let unsold = report
            .items
            .iter()
            .find(|i| i.kode_kecil == "L1CAV201")
            .unwrap();
        assert_eq!(unsold.avg_sales, 0);
        assert_eq!(unsold.tw, None);
        assert_eq!(unsold.to, None);

        // 只有銷售、無庫存
        let no_stock = report
            .items
            .iter()
            .find(|i| i.kode_kecil == "X9ABC001")
            .unwrap();
        assert_eq!(no_stock.global_stock, 0);
        assert_eq!(no_stock.avg_sales, 2);
        assert_eq!(no_stock.to, Some(Decimal::ZERO));

        assert_eq!(report.warehouse_summary.whb, 20);
        assert_eq!(report.warehouse_summary.whs, 30);
        assert_eq!(report.stok_toko_summary.total, 24);
        assert_eq!(report.stok_toko_summary.by_area[&Area::Bali], 14);
        assert_eq!(report.total_global_stock, 74);
    }

    #[test]
    fn test_entity_selection() {
        let classifier = test_classifier();
        let entities = vec!["LJBB".to_string(), "MBB".to_string()];
        let report =
            TurnoverCalculator::new(&classifier).calculate(&BTreeMap::new(), &snapshot(), &entities);

        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].kode_kecil, "L1CAV201");
        assert_eq!(report.total_global_stock, 4);
        assert!(report.sales_period.months.is_empty());
    }

    #[test]
    fn test_report_json_shape() {
        let classifier = test_classifier();
        let report = TurnoverCalculator::new(&classifier).calculate(&sales(), &snapshot(), &[]);
        let json = serde_json::to_value(&report).unwrap();

        assert!(json["warehouseSummary"]["WHB"].is_number());
        assert!(json["stokTokoSummary"]["TOTAL"].is_number());
        assert!(json["stokTokoSummary"]["Jawa Timur"].is_number());

        let item = &json["items"][0];
        assert!(item["kodeKecil"].is_string());
        assert!(item["salesByArea"]["Bali"]["avg"].is_number());
        assert!(item.get("salesM1").is_some());
    }
}
