//! 庫存快照模型

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::product::{article_name, product_code};

/// 庫存品項類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// 門市庫存
    Retail,
    /// 倉庫庫存
    Warehouse,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Retail => "retail",
            ItemType::Warehouse => "warehouse",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "retail" => Ok(ItemType::Retail),
            "warehouse" => Ok(ItemType::Warehouse),
            other => Err(format!("未知品項類型: {}", other)),
        }
    }
}

/// 庫存品項（一個 SKU 在各據點的庫存）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// SKU（含尺寸）
    #[serde(default, deserialize_with = "lenient_text")]
    pub sku: String,

    /// 商品代碼（kode kecil）
    #[serde(default, deserialize_with = "lenient_text")]
    pub kode_kecil: String,

    /// 品名
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub gender: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub series: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub size: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub tier: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub category: String,

    /// 快照提供的總庫存
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: i64,

    /// 據點名稱 → 庫存數量
    #[serde(default, deserialize_with = "null_as_default")]
    pub store_stock: BTreeMap<String, i64>,
}

impl InventoryItem {
    /// 創建新的庫存品項
    pub fn new(sku: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            ..Self::default()
        }
    }

    /// 建構器模式：設置品名
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 建構器模式：設置商品代碼
    pub fn with_kode_kecil(mut self, kode_kecil: impl Into<String>) -> Self {
        self.kode_kecil = kode_kecil.into();
        self
    }

    /// 建構器模式：設置性別分類
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = gender.into();
        self
    }

    /// 建構器模式：設置據點庫存（同時累加總庫存）
    pub fn with_stock(mut self, location: impl Into<String>, qty: i64) -> Self {
        self.store_stock.insert(location.into(), qty);
        self.total = self.store_stock.values().sum();
        self
    }

    /// 商品代碼：優先使用快照的 kode_kecil，否則由 SKU 推導
    pub fn product_code(&self) -> &str {
        if self.kode_kecil.is_empty() {
            product_code(&self.sku)
        } else {
            &self.kode_kecil
        }
    }

    /// 款式名稱（品名去除尺寸）
    pub fn article(&self) -> String {
        article_name(&self.name)
    }

    /// 正庫存的據點
    pub fn positive_stock(&self) -> impl Iterator<Item = (&str, i64)> {
        self.store_stock
            .iter()
            .filter(|(_, &qty)| qty > 0)
            .map(|(location, &qty)| (location.as_str(), qty))
    }
}

/// 單一實體（事業單位）的庫存
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityInventory {
    #[serde(default, deserialize_with = "null_as_default")]
    pub retail: Vec<InventoryItem>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub warehouse: Vec<InventoryItem>,
}

impl EntityInventory {
    /// 依類型取得品項
    pub fn items(&self, item_type: ItemType) -> &[InventoryItem] {
        match item_type {
            ItemType::Retail => &self.retail,
            ItemType::Warehouse => &self.warehouse,
        }
    }

    /// 所有品項（門市在前、倉庫在後）
    pub fn all_items(&self) -> impl Iterator<Item = (ItemType, &InventoryItem)> {
        self.retail
            .iter()
            .map(|item| (ItemType::Retail, item))
            .chain(self.warehouse.iter().map(|item| (ItemType::Warehouse, item)))
    }
}

/// 庫存快照：實體名稱（如 "DDD"）→ 庫存
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventorySnapshot {
    pub entities: BTreeMap<String, EntityInventory>,
}

impl InventorySnapshot {
    /// 創建空快照
    pub fn new() -> Self {
        Self::default()
    }

    /// 從結構化 JSON 文件解析
    pub fn from_json_str(content: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// 建構器模式：添加實體
    pub fn with_entity(mut self, name: impl Into<String>, inventory: EntityInventory) -> Self {
        self.entities.insert(name.into(), inventory);
        self
    }

    /// 取得實體庫存
    pub fn entity(&self, name: &str) -> Option<&EntityInventory> {
        self.entities.get(name)
    }

    /// 遍歷所有實體
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntityInventory)> {
        self.entities.iter().map(|(name, inv)| (name.as_str(), inv))
    }

    /// 品項總數
    pub fn item_count(&self) -> usize {
        self.entities
            .values()
            .map(|e| e.retail.len() + e.warehouse.len())
            .sum()
    }
}

/// JSON null 視同預設值
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 文字欄位：接受字串、數字或 null
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Str(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Option::<Text>::deserialize(deserializer)? {
        Some(Text::Str(s)) => s,
        Some(Text::Int(n)) => n.to_string(),
        Some(Text::Float(n)) => n.to_string(),
        Some(Text::Bool(b)) => b.to_string(),
        None => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snapshot() {
        let json = r#"{
            "DDD": {
                "retail": [{
                    "sku": "M1SPV201Z40",
                    "kode_kecil": null,
                    "name": "SANDAL PRIA, 40",
                    "gender": "MEN",
                    "size": 40,
                    "total": 7,
                    "store_stock": {"ZUMA Dalung": 5, "ZUMA Kapal": 2}
                }]
            },
            "LJBB": {"retail": null}
        }"#;

        let snapshot = InventorySnapshot::from_json_str(json).unwrap();
        assert_eq!(snapshot.entities.len(), 2);
        assert_eq!(snapshot.item_count(), 1);

        let item = &snapshot.entity("DDD").unwrap().retail[0];
        assert_eq!(item.product_code(), "M1SPV201");
        assert_eq!(item.article(), "SANDAL PRIA");
        assert_eq!(item.size, "40");
        assert_eq!(item.total, 7);
        assert_eq!(item.store_stock.get("ZUMA Dalung"), Some(&5));

        assert!(snapshot.entity("LJBB").unwrap().retail.is_empty());
        assert!(snapshot.entity("LJBB").unwrap().warehouse.is_empty());
    }

    #[test]
    fn test_kode_kecil_preferred() {
        let item = InventoryItem::new("M1SPV201Z40").with_kode_kecil("M1SPV201X");
        assert_eq!(item.product_code(), "M1SPV201X");
    }

    #[test]
    fn test_positive_stock() {
        let item = InventoryItem::new("SKU1")
            .with_stock("A", 3)
            .with_stock("B", 0)
            .with_stock("C", -1);

        let positive: Vec<_> = item.positive_stock().collect();
        assert_eq!(positive, vec![("A", 3)]);
        assert_eq!(item.total, 2);
    }

    #[test]
    fn test_item_type_from_str() {
        assert_eq!("Retail".parse::<ItemType>().unwrap(), ItemType::Retail);
        assert_eq!("warehouse".parse::<ItemType>().unwrap(), ItemType::Warehouse);
        assert!("online".parse::<ItemType>().is_err());
    }
}
