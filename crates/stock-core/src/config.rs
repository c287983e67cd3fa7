//! 門市分類配置模型
//!
//! 分類規則以「有序的 (樣式, 代碼) 清單」表示，宣告順序即比對順序。

use crate::classification::{Area, WarehouseCode};
use crate::{Result, StockError};
use serde::{Deserialize, Serialize};

/// 名稱樣式 → 倉庫代碼
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehousePattern {
    /// 比對樣式（小寫）
    pub pattern: String,

    /// 倉庫代碼
    pub warehouse: WarehouseCode,
}

impl WarehousePattern {
    pub fn new(pattern: impl Into<String>, warehouse: WarehouseCode) -> Self {
        Self {
            pattern: pattern.into(),
            warehouse,
        }
    }
}

/// 地區 → 名稱片段清單
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaRule {
    /// 地區
    pub area: Area,

    /// 門市名稱片段（任一片段出現於門市名稱即命中）
    pub fragments: Vec<String>,
}

impl AreaRule {
    pub fn new(area: Area, fragments: Vec<String>) -> Self {
        Self { area, fragments }
    }
}

/// 門市分類配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// 門市 → 補貨倉庫（精確比對後，依宣告順序做雙向子字串比對）
    #[serde(default)]
    pub store_warehouses: Vec<WarehousePattern>,

    /// 地區規則（依宣告順序，第一個命中的地區勝出）
    #[serde(default)]
    pub areas: Vec<AreaRule>,

    /// 倉庫據點名稱 → 倉庫代碼（單向包含比對）
    #[serde(default)]
    pub warehouse_locations: Vec<WarehousePattern>,
}

impl ClassifierConfig {
    /// 創建空的分類配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 文件內容解析並正規化
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: ClassifierConfig = serde_json::from_str(content)?;
        config.normalized()
    }

    /// 建構器模式：添加門市倉庫對應
    pub fn with_store_warehouse(mut self, pattern: &str, warehouse: WarehouseCode) -> Self {
        self.store_warehouses
            .push(WarehousePattern::new(pattern, warehouse));
        self
    }

    /// 建構器模式：添加地區規則
    pub fn with_area(mut self, area: Area, fragments: &[&str]) -> Self {
        self.areas.push(AreaRule::new(
            area,
            fragments.iter().map(|f| f.to_string()).collect(),
        ));
        self
    }

    /// 建構器模式：添加倉庫據點對應
    pub fn with_warehouse_location(mut self, pattern: &str, warehouse: WarehouseCode) -> Self {
        self.warehouse_locations
            .push(WarehousePattern::new(pattern, warehouse));
        self
    }

    /// 正規化所有樣式（去空白、小寫）並檢查空樣式
    ///
    /// 空樣式會與任何門市名稱互相包含，必須拒絕
    pub fn normalized(mut self) -> Result<Self> {
        for entry in self
            .store_warehouses
            .iter_mut()
            .chain(self.warehouse_locations.iter_mut())
        {
            entry.pattern = normalize_name(&entry.pattern);
            if entry.pattern.is_empty() {
                return Err(StockError::InvalidConfig(format!(
                    "倉庫 {} 的樣式為空",
                    entry.warehouse
                )));
            }
        }

        for rule in &mut self.areas {
            for fragment in &mut rule.fragments {
                *fragment = normalize_name(fragment);
                if fragment.is_empty() {
                    return Err(StockError::InvalidConfig(format!(
                        "地區 {} 含有空片段",
                        rule.area
                    )));
                }
            }
        }

        Ok(self)
    }

    /// 規則總數
    pub fn rule_count(&self) -> usize {
        self.store_warehouses.len()
            + self.warehouse_locations.len()
            + self.areas.iter().map(|r| r.fragments.len()).sum::<usize>()
    }
}

/// 名稱正規化：去頭尾空白並轉小寫
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
