//! 分類表載入

use std::path::Path;

use stock_calc::StoreClassifier;
use stock_core::{ClassifierConfig, Result, StockError};

/// 預設分類表路徑
pub const DEFAULT_CLASSIFIER_PATH: &str = "config/classifier.json";

/// 讀取分類表（已正規化、已檢查空樣式）
pub fn load_classifier_config(path: &Path) -> Result<ClassifierConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| StockError::io(path.display().to_string(), e))?;

    let config = ClassifierConfig::from_json_str(&content)?;
    tracing::info!("分類表 {}：規則 {} 條", path.display(), config.rule_count());
    Ok(config)
}

/// 讀取分類表並建立分類器
pub fn load_classifier(path: &Path) -> Result<StoreClassifier> {
    StoreClassifier::new(load_classifier_config(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use stock_core::{Area, WarehouseCode};

    #[test]
    fn test_load_classifier() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classifier.json");
        fs::write(
            &path,
            r#"{
                "store_warehouses": [{"pattern": " ZUMA Bajra ", "warehouse": "WHB"}],
                "areas": [{"area": "Bali", "fragments": ["Bajra"]}]
            }"#,
        )
        .unwrap();

        let classifier = load_classifier(&path).unwrap();
        let result = classifier.classify("zuma bajra");

        assert_eq!(result.warehouse, Some(WarehouseCode::WHB));
        assert_eq!(result.area, Area::Bali);
        assert!(classifier.config().warehouse_locations.is_empty());
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classifier.json");
        fs::write(
            &path,
            r#"{"store_warehouses": [{"pattern": "  ", "warehouse": "WHJ"}]}"#,
        )
        .unwrap();

        assert!(matches!(
            load_classifier_config(&path),
            Err(StockError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_shipped_classifier_table() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../").join(DEFAULT_CLASSIFIER_PATH);
        let classifier = load_classifier(&path).unwrap();

        assert_eq!(
            classifier.classify("ZUMA Dalung").warehouse,
            Some(WarehouseCode::WHB)
        );
        assert_eq!(classifier.area_for("ZUMA Pluit Village"), Area::Jakarta);
        assert_eq!(classifier.area_for("ZUMA Mega Mall Manado"), Area::Sulawesi);
        assert_eq!(classifier.area_for("ZUMA Nagoya Hill Batam"), Area::Batam);
        assert_eq!(
            classifier.warehouse_location_code("Warehouse Pusat Protol"),
            Some(WarehouseCode::WHS)
        );
    }
}
