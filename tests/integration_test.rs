//! 集成測試

use chrono::NaiveDate;
use clap::Parser;
use rstest::rstest;
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};

use stock::query::{self, QueryCli};
use stock::report::{self, ReportCli, STOCK_CONTROL_FILE};
use stock_calc::metrics::average_monthly_sales;
use stock_calc::{SalesAggregator, StockControlCalculator, StoreClassifier};
use stock_core::{Area, EntityInventory, InventoryItem, StockStatus};

const HEADER: &str = "Tanggal Pesanan;Toko;Sku;Jumlah;Produk";

fn classifier_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("config/classifier.json")
}

fn classifier() -> StoreClassifier {
    stock_io::load_classifier(&classifier_path()).unwrap()
}

fn two_row_csv() -> String {
    format!(
        "{}\n2024-01-05;StoreA;SKU1;10;ProductOne\n2024-01-10;StoreA;SKU1;20;ProductOne\n",
        HEADER
    )
}

fn report_cli(args: &[&str]) -> ReportCli {
    let mut argv = vec![
        "stock-report".to_string(),
        "--classifier".to_string(),
        classifier_path().display().to_string(),
    ];
    argv.extend(args.iter().map(|a| a.to_string()));
    ReportCli::try_parse_from(argv).unwrap()
}

#[test]
fn test_sales_to_days_of_stock() {
    stock::logging::init_test();

    // 1. 解析 CSV
    let load = stock_io::parse_sales(&two_row_csv()).unwrap();
    assert_eq!(load.records.len(), 2);

    // 2. 依 (SKU, 門市) 彙總
    let classifier = classifier();
    let aggregate = SalesAggregator::new(&classifier).aggregate(&load.records);

    let range = aggregate.date_range.unwrap();
    assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    assert_eq!(range.days, 6);

    let sku1 = aggregate.find("SKU1", "StoreA").unwrap();
    assert_eq!(sku1.total_qty, 30);
    assert_eq!(sku1.daily_rate, Decimal::from(5));

    // 3. 目前庫存 50 → DOS 10 → CRITICAL
    let inventory = EntityInventory {
        retail: vec![InventoryItem::new("SKU1").with_stock("StoreA", 50)],
        warehouse: Vec::new(),
    };
    let result = StockControlCalculator::new(&classifier).calculate(&inventory, &aggregate);

    let row = &result.sku_control[0];
    assert_eq!(row.dos, 10);
    assert_eq!(row.status, StockStatus::Critical);
}

#[rstest]
#[case(50, 10, StockStatus::Critical)]
#[case(100, 20, StockStatus::Warning)]
#[case(200, 40, StockStatus::Ok)]
#[case(400, 80, StockStatus::Overstock)]
#[case(0, 0, StockStatus::Critical)]
fn test_stock_level_to_status(#[case] stock: i64, #[case] dos: i64, #[case] status: StockStatus) {
    let classifier = classifier();
    let load = stock_io::parse_sales(&two_row_csv()).unwrap();
    let aggregate = SalesAggregator::new(&classifier).aggregate(&load.records);

    let inventory = EntityInventory {
        retail: vec![
            InventoryItem::new("SKU1").with_stock("StoreA", stock),
            InventoryItem::new("SKU1").with_stock("StoreB", 30),
        ],
        warehouse: Vec::new(),
    };
    let result = StockControlCalculator::new(&classifier).calculate(&inventory, &aggregate);

    // StoreB 沒有銷售 → 999
    let store_b = result.sku_control.iter().find(|r| r.store == "StoreB").unwrap();
    assert_eq!(store_b.dos, stock_calc::NO_SALES_DOS);

    match result.sku_control.iter().find(|r| r.store == "StoreA") {
        Some(row) => {
            assert_eq!(row.dos, dos);
            assert_eq!(row.status, status);
        }
        // 零庫存不產生控管列
        None => assert_eq!(stock, 0),
    }
}

#[test]
fn test_average_over_sparse_months() {
    assert_eq!(average_monthly_sales(&[50, 0, 100]), 50);
}

#[test]
fn test_csv_missing_fields_and_packaging() {
    let content = format!(
        "{}\n2024-01-05;StoreA;SKU1\n2024-01-05;StoreA;InBox-01;1;Inbox\n",
        HEADER
    );

    let rows = stock_io::sales_csv::parse_rows(&content).unwrap();
    assert_eq!(rows[0]["Jumlah"], "");
    assert_eq!(rows[0]["Produk"], "");

    let load = stock_io::parse_sales(&content).unwrap();
    assert_eq!(load.product_rows, 1);
    assert!(load.records.is_empty());
}

#[test]
fn test_area_partition_with_shipped_table() {
    let classifier = classifier();
    let csv = format!(
        "{}\n\
         2024-01-02;ZUMA Dalung;M1SPV201Z40;3;A\n\
         2024-01-03;ZUMA Pluit Village;M1SPV201Z41;4;A\n\
         2024-01-04;ZUMA Lippo Batu;M1SPV201Z42;5;A\n\
         2024-01-05;Toko Online;M1SPV201Z40;6;A\n\
         2024-02-01;ZUMA Mega Mall Manado;M1SPV201Z40;2;A\n",
        HEADER
    );
    let load = stock_io::parse_sales(&csv).unwrap();
    let grouped = SalesAggregator::new(&classifier).by_product_month(&load.records);

    let sales = &grouped["M1SPV201"];
    for (month, total) in &sales.months {
        let by_area: i64 = Area::ALL
            .iter()
            .map(|&area| sales.area_month_total(area, month))
            .sum();
        assert_eq!(by_area, *total);
    }
    assert_eq!(sales.area_month_total(Area::Other, "2024-01"), 6);
    assert_eq!(sales.area_month_total(Area::Sulawesi, "2024-02"), 2);
}

#[test]
fn test_classification_is_deterministic() {
    let first = classifier();
    let second = classifier();

    for name in ["ZUMA Batubulan", "zuma lippo sidoarjo", "ZUMA SKA Mall", "", "random"] {
        assert_eq!(first.classify(name), first.classify(name));
        assert_eq!(first.classify(name), second.classify(name));
    }
}

#[test]
fn test_report_dos_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let sales = dir.path().join("sales.csv");
    let inventory = dir.path().join("dashboard_inventory.html");
    let out_dir = dir.path().join("out");

    fs::write(&sales, two_row_csv()).unwrap();
    fs::write(
        &inventory,
        "<script>\nconst allData = {\"DDD\": {\"retail\": [{\"sku\": \"SKU1\", \"name\": \"PRODUCT ONE, 40\", \"store_stock\": {\"StoreA\": 50}}]}};\nconst allStores = {};\n</script>",
    )
    .unwrap();

    let cli = report_cli(&[
        "--out-dir",
        &out_dir.display().to_string(),
        "dos",
        "--sales",
        &sales.display().to_string(),
        "--inventory",
        &inventory.display().to_string(),
    ]);

    let written = report::run(&cli).unwrap();
    assert_eq!(written, vec![out_dir.join(STOCK_CONTROL_FILE)]);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();

    assert!(json["generated"].is_string());
    assert_eq!(json["salesPeriod"]["days"], 6);

    let row = &json["skuControl"][0];
    assert_eq!(row["sku"], "SKU1");
    assert_eq!(row["dos"], 10);
    assert_eq!(row["status"], "CRITICAL");
    assert_eq!(row["dailyRate"], 5.0);
    assert_eq!(json["storeControl"][0]["avgDos"], 10);
}

#[test]
fn test_report_missing_inventory_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let sales = dir.path().join("sales.csv");
    fs::write(&sales, two_row_csv()).unwrap();

    let cli = report_cli(&[
        "--out-dir",
        &dir.path().display().to_string(),
        "dos",
        "--sales",
        &sales.display().to_string(),
        "--inventory",
        &dir.path().join("missing.json").display().to_string(),
    ]);

    let err = report::run(&cli).unwrap_err();
    assert!(format!("{:#}", err).contains("missing.json"));
}

#[test]
fn test_query_stats_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let inventory = dir.path().join("inventory.json");
    fs::write(
        &inventory,
        r#"{
            "DDD": {
                "retail": [
                    {"sku": "M1SPV201Z40", "gender": "MEN", "total": 5, "store_stock": {"ZUMA Dalung": 5}},
                    {"sku": "M1SPV201Z41", "total": 0, "store_stock": {}}
                ],
                "warehouse": [
                    {"sku": "M1SPV201Z40", "total": 12, "store_stock": {"Warehouse Pluit": 12}}
                ]
            }
        }"#,
    )
    .unwrap();

    let run = |args: &[&str]| {
        let mut argv = vec![
            "stock-query".to_string(),
            "--inventory".to_string(),
            inventory.display().to_string(),
            "--classifier".to_string(),
            classifier_path().display().to_string(),
        ];
        argv.extend(args.iter().map(|a| a.to_string()));
        let cli = QueryCli::try_parse_from(argv).unwrap();
        serde_json::from_str::<serde_json::Value>(&query::run(&cli).unwrap()).unwrap()
    };

    let stats = run(&["stats"]);
    assert_eq!(stats["totalSku"], 2);
    assert_eq!(stats["totalStock"], 5);
    assert_eq!(stats["outOfStock"], 1);
    assert_eq!(stats["lowStock"], 1);
    assert_eq!(stats["byEntity"]["DDD"]["warehouse"], 12);
    assert_eq!(stats["byGender"]["OTHER"], 0);

    let found = run(&["search", "m1spv201z40"]);
    assert_eq!(found.as_array().unwrap().len(), 2);
    assert_eq!(found[1]["type"], "warehouse");

    let jakarta = run(&["area", "jakarta", "warehouse"]);
    assert_eq!(jakarta[0]["store"], "Warehouse Pluit");

    let store = run(&["store", "zuma", "dalung"]);
    assert_eq!(store["store"], "zuma dalung");
    assert_eq!(store["totalStock"], 5);
}
