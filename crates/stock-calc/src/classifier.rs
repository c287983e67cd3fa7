//! 門市分類器
//!
//! 由門市名稱推導補貨倉庫與地區。分類表於建構時注入，執行期間不可變。

use std::collections::HashMap;

use stock_core::config::normalize_name;
use stock_core::{Area, ClassifierConfig, StoreClassification, WarehouseCode};

/// 門市分類器
#[derive(Debug, Clone)]
pub struct StoreClassifier {
    /// 已正規化的分類配置
    config: ClassifierConfig,

    /// 精確比對索引（重複的樣式以第一次宣告為準）
    exact_warehouses: HashMap<String, WarehouseCode>,
}

impl StoreClassifier {
    /// 創建新的分類器
    pub fn new(config: ClassifierConfig) -> stock_core::Result<Self> {
        let config = config.normalized()?;

        let mut exact_warehouses = HashMap::new();
        for entry in &config.store_warehouses {
            exact_warehouses
                .entry(entry.pattern.clone())
                .or_insert(entry.warehouse);
        }

        tracing::debug!(
            "分類器載入：門市倉庫 {} 筆，地區 {} 個，倉庫據點 {} 筆",
            config.store_warehouses.len(),
            config.areas.len(),
            config.warehouse_locations.len()
        );

        Ok(Self {
            config,
            exact_warehouses,
        })
    }

    /// 分類門市（倉庫與地區各自獨立判定）
    pub fn classify(&self, store_name: &str) -> StoreClassification {
        StoreClassification {
            warehouse: self.warehouse_for(store_name),
            area: self.area_for(store_name),
        }
    }

    /// 補貨倉庫
    ///
    /// 先精確比對；否則依宣告順序掃描，樣式包含於名稱、或名稱包含於樣式即命中。
    /// 多個樣式同時命中時取宣告順序第一個，而非最長比對。
    pub fn warehouse_for(&self, store_name: &str) -> Option<WarehouseCode> {
        let normalized = normalize_name(store_name);
        if normalized.is_empty() {
            return None;
        }

        if let Some(&code) = self.exact_warehouses.get(&normalized) {
            return Some(code);
        }

        self.config
            .store_warehouses
            .iter()
            .find(|entry| {
                normalized.contains(entry.pattern.as_str()) || entry.pattern.contains(&normalized)
            })
            .map(|entry| entry.warehouse)
    }

    /// 地區：依規則順序，第一個有片段出現在名稱中的地區
    pub fn area_for(&self, store_name: &str) -> Area {
        let normalized = normalize_name(store_name);
        if normalized.is_empty() {
            return Area::Other;
        }

        self.config
            .areas
            .iter()
            .find(|rule| {
                rule.fragments
                    .iter()
                    .any(|fragment| normalized.contains(fragment.as_str()))
            })
            .map(|rule| rule.area)
            .unwrap_or(Area::Other)
    }

    /// 倉庫據點名稱 → 倉庫代碼（單向包含）
    pub fn warehouse_location_code(&self, location: &str) -> Option<WarehouseCode> {
        let normalized = normalize_name(location);
        self.config
            .warehouse_locations
            .iter()
            .find(|entry| normalized.contains(entry.pattern.as_str()))
            .map(|entry| entry.warehouse)
    }

    /// 據點地區：倉庫據點取其倉庫所在地區，其餘依門市規則
    pub fn location_area(&self, location: &str) -> Area {
        match self.warehouse_location_code(location) {
            Some(code) => code.home_area(),
            None => self.area_for(location),
        }
    }

    /// 獲取分類配置引用
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
}
