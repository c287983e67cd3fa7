//! 日誌初始化
//!
//! 使用 tracing-subscriber，輸出到 stderr，讓 stdout 只保留 JSON 與表格。

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日誌
///
/// `RUST_LOG` 有設定時優先，否則使用 `default_level`（如 `"info"`）。
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// 測試用：debug 等級，寫入測試輸出；重複初始化時忽略
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
