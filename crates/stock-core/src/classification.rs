//! 門市分類與庫存狀態

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 地區
///
/// 宣告順序即分類優先順序，也是報表輸出的排列順序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Area {
    #[serde(rename = "Bali")]
    Bali,
    #[serde(rename = "Lombok")]
    Lombok,
    #[serde(rename = "Jakarta")]
    Jakarta,
    #[serde(rename = "Jawa Timur")]
    JawaTimur,
    #[serde(rename = "Sulawesi")]
    Sulawesi,
    #[serde(rename = "Batam")]
    Batam,
    #[serde(rename = "Sumatera")]
    Sumatera,
    #[serde(rename = "Other")]
    Other,
}

impl Area {
    /// 所有地區（依優先順序）
    pub const ALL: [Area; 8] = [
        Area::Bali,
        Area::Lombok,
        Area::Jakarta,
        Area::JawaTimur,
        Area::Sulawesi,
        Area::Batam,
        Area::Sumatera,
        Area::Other,
    ];

    /// 顯示名稱（與 JSON 輸出一致）
    pub fn name(&self) -> &'static str {
        match self {
            Area::Bali => "Bali",
            Area::Lombok => "Lombok",
            Area::Jakarta => "Jakarta",
            Area::JawaTimur => "Jawa Timur",
            Area::Sulawesi => "Sulawesi",
            Area::Batam => "Batam",
            Area::Sumatera => "Sumatera",
            Area::Other => "Other",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Area {
    type Err = String;

    /// 不分大小寫、忽略空白；另接受 "jatim" 簡稱
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        if compact == "jatim" {
            return Ok(Area::JawaTimur);
        }

        Area::ALL
            .into_iter()
            .find(|area| area.name().replace(' ', "").to_lowercase() == compact)
            .ok_or_else(|| format!("未知地區: {}", s))
    }
}

/// 倉庫代碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WarehouseCode {
    /// Warehouse Bali（Gatsu）
    WHB,
    /// Warehouse Jakarta（Pluit）
    WHJ,
    /// Warehouse Pusat（Jawa Timur）
    WHS,
}

impl WarehouseCode {
    pub const ALL: [WarehouseCode; 3] = [WarehouseCode::WHB, WarehouseCode::WHJ, WarehouseCode::WHS];

    /// 倉庫所在地區
    pub fn home_area(&self) -> Area {
        match self {
            WarehouseCode::WHB => Area::Bali,
            WarehouseCode::WHJ => Area::Jakarta,
            WarehouseCode::WHS => Area::JawaTimur,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WarehouseCode::WHB => "WHB",
            WarehouseCode::WHJ => "WHJ",
            WarehouseCode::WHS => "WHS",
        }
    }
}

impl fmt::Display for WarehouseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 門市分類結果（由門市名稱推導，不儲存）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreClassification {
    /// 補貨倉庫（無對應倉庫時為 None）
    pub warehouse: Option<WarehouseCode>,

    /// 地區
    pub area: Area,
}

impl StoreClassification {
    /// 未分類門市
    pub fn unclassified() -> Self {
        Self {
            warehouse: None,
            area: Area::Other,
        }
    }
}

/// 無銷售時的庫存天數哨兵值
pub const NO_SALES_DOS: i64 = 999;

/// 庫存狀態（依庫存天數 DOS 分級）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StockStatus {
    /// DOS < 14
    Critical,
    /// 14 ≤ DOS < 30
    Warning,
    /// 30 ≤ DOS < 60
    Ok,
    /// DOS ≥ 60
    Overstock,
}

impl StockStatus {
    pub const CRITICAL_BELOW: i64 = 14;
    pub const WARNING_BELOW: i64 = 30;
    pub const OK_BELOW: i64 = 60;

    /// 依庫存天數分級（下界包含、上界不包含）
    pub fn from_dos(dos: i64) -> Self {
        if dos < Self::CRITICAL_BELOW {
            StockStatus::Critical
        } else if dos < Self::WARNING_BELOW {
            StockStatus::Warning
        } else if dos < Self::OK_BELOW {
            StockStatus::Ok
        } else {
            StockStatus::Overstock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Critical => "CRITICAL",
            StockStatus::Warning => "WARNING",
            StockStatus::Ok => "OK",
            StockStatus::Overstock => "OVERSTOCK",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, StockStatus::Critical)]
    #[case(13, StockStatus::Critical)]
    #[case(14, StockStatus::Warning)]
    #[case(29, StockStatus::Warning)]
    #[case(30, StockStatus::Ok)]
    #[case(59, StockStatus::Ok)]
    #[case(60, StockStatus::Overstock)]
    #[case(NO_SALES_DOS, StockStatus::Overstock)]
    fn test_status_boundaries(#[case] dos: i64, #[case] expected: StockStatus) {
        assert_eq!(StockStatus::from_dos(dos), expected);
    }

    #[test]
    fn test_area_from_str() {
        assert_eq!("jawa timur".parse::<Area>().unwrap(), Area::JawaTimur);
        assert_eq!("JawaTimur".parse::<Area>().unwrap(), Area::JawaTimur);
        assert_eq!("jatim".parse::<Area>().unwrap(), Area::JawaTimur);
        assert_eq!("BALI".parse::<Area>().unwrap(), Area::Bali);
        assert!("atlantis".parse::<Area>().is_err());
    }

    #[test]
    fn test_area_serde_names() {
        let json = serde_json::to_string(&Area::JawaTimur).unwrap();
        assert_eq!(json, "\"Jawa Timur\"");

        let status = serde_json::to_string(&StockStatus::Overstock).unwrap();
        assert_eq!(status, "\"OVERSTOCK\"");
    }

    #[test]
    fn test_warehouse_home_area() {
        assert_eq!(WarehouseCode::WHB.home_area(), Area::Bali);
        assert_eq!(WarehouseCode::WHJ.home_area(), Area::Jakarta);
        assert_eq!(WarehouseCode::WHS.home_area(), Area::JawaTimur);
    }
}
