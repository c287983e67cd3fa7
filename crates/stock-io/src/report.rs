//! JSON 報表輸出

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use stock_core::{Result, StockError};

/// 報表外層：產生時間 + 報表內容（內容欄位攤平到同一層）
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a, T: Serialize> {
    pub generated: DateTime<Utc>,

    #[serde(flatten)]
    pub body: &'a T,
}

impl<'a, T: Serialize> Report<'a, T> {
    /// 以目前時間建立報表
    pub fn new(body: &'a T) -> Self {
        Self::generated_at(body, Utc::now())
    }

    pub fn generated_at(body: &'a T, generated: DateTime<Utc>) -> Self {
        Self { generated, body }
    }

    /// 寫入 JSON 檔（縮排格式）
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| StockError::io(path.display().to_string(), e))?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, self)?;
        writer
            .flush()
            .map_err(|e| StockError::io(path.display().to_string(), e))?;

        tracing::info!("報表已輸出: {}", path.display());
        Ok(())
    }
}

/// 在輸出目錄寫入報表，返回完整路徑
pub fn write_report<T: Serialize>(out_dir: &Path, file_name: &str, body: &T) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .map_err(|e| StockError::io(out_dir.display().to_string(), e))?;

    let path = out_dir.join(file_name);
    Report::new(body).write_to(&path)?;
    Ok(path)
}

/// 讀回先前輸出的報表（`generated` 等額外欄位忽略）
pub fn read_report<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| StockError::io(path.display().to_string(), e))?;
    Ok(serde_json::from_str(&content)?)
}
