use std::fs;

use canteen_core::{
    storage::{ProductStore, SaleStore},
    Clock, SalesLedger,
};
use canteen_domain::{DayKey, Product, ProductDraft, SaleDraft, SaleId, SaleRecord};
use canteen_storage_json::JsonStore;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;
use tempfile::tempdir;

struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 31, 12, 0, 0).unwrap()
    }
}

fn day(raw: &str) -> DayKey {
    raw.parse().expect("day")
}

#[test]
fn missing_files_load_as_empty_collections() {
    let dir = tempdir().expect("tempdir");
    let store = JsonStore::new(dir.path().join("data")).expect("create store");

    assert!(store.load_sales().expect("load sales").is_empty());
    assert!(store.load_products().expect("load products").is_empty());
    assert!(store.list_backups().expect("list backups").is_empty());
}

#[test]
fn sales_are_persisted_as_a_top_level_array() {
    let dir = tempdir().expect("tempdir");
    let store = JsonStore::new(dir.path().to_path_buf()).expect("create store");
    let record = SaleRecord::new(
        SaleId::new("sale-1"),
        day("2024-05-10"),
        "Juice",
        dec!(3.50),
        2,
        Utc::now(),
    );
    store.save_sales(&[record.clone()]).expect("save");

    let raw = fs::read_to_string(store.sales_path()).expect("read file");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
    let entries = value.as_array().expect("top-level array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], "sale-1");
    assert_eq!(entries[0]["date"], "2024-05-10");
    assert_eq!(entries[0]["unitPrice"], 3.5);
    assert_eq!(entries[0]["total"], 7.0);
    assert!(entries[0].get("createdAt").is_some());

    assert_eq!(store.load_sales().expect("load"), vec![record]);
    assert!(!dir.path().join("sales.json.tmp").exists());
}

#[test]
fn legacy_records_get_default_quantity_and_fresh_totals() {
    let dir = tempdir().expect("tempdir");
    let store = JsonStore::new(dir.path().to_path_buf()).expect("create store");
    fs::write(
        store.sales_path(),
        r#"[
          {"id": "1715340000000", "date": "2024-05-10", "item": "Juice", "unitPrice": 3.5,
           "total": 99.0, "createdAt": "2024-05-10T10:00:00Z"},
          {"id": "1715340000001", "date": "2024-05-10", "item": "Snack", "unitPrice": 2.0,
           "quantity": 3, "createdAt": "2024-05-10T10:05:00Z"}
        ]"#,
    )
    .expect("write legacy file");

    let ledger = SalesLedger::new(Box::new(store.clone()), Box::new(FixedClock));
    let records = ledger.query_by_day(day("2024-05-10")).expect("query");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].quantity(), 1);
    assert_eq!(records[0].total(), dec!(3.50));
    assert_eq!(records[1].total(), dec!(6.00));
    assert_eq!(ledger.daily_total(day("2024-05-10")).expect("total"), dec!(9.50));

    let warnings = ledger.integrity_warnings().expect("warnings");
    assert!(
        warnings.iter().any(|w| w.contains("1715340000000")),
        "stale stored totals should be reported: {warnings:?}"
    );
}

#[test]
fn corrupt_sales_file_is_reported_as_serde_error() {
    let dir = tempdir().expect("tempdir");
    let store = JsonStore::new(dir.path().to_path_buf()).expect("create store");
    fs::write(store.sales_path(), "{ not json").expect("write");

    let err = store.load_sales().expect_err("corrupt file must fail");
    assert!(
        matches!(err, canteen_core::CoreError::Serde(_)),
        "unexpected error: {err:?}"
    );
}

#[test]
fn saves_rotate_backups_within_retention() {
    let dir = tempdir().expect("tempdir");
    let store = JsonStore::with_retention(dir.path().to_path_buf(), 2).expect("create store");
    let ledger = SalesLedger::new(Box::new(store.clone()), Box::new(FixedClock));

    for n in 0..5 {
        ledger
            .append(day("2024-05-10"), SaleDraft::new(format!("Item {n}"), dec!(1.00)))
            .expect("append");
    }

    let backups = store.list_backups().expect("list backups");
    assert!(!backups.is_empty());
    assert!(backups.len() <= 2, "retention exceeded: {}", backups.len());
    assert!(backups
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));
}

#[test]
fn restoring_a_backup_replaces_current_sales() {
    let dir = tempdir().expect("tempdir");
    let store = JsonStore::new(dir.path().to_path_buf()).expect("create store");
    let ledger = SalesLedger::new(Box::new(store.clone()), Box::new(FixedClock));

    ledger
        .append(day("2024-05-10"), SaleDraft::new("Juice", dec!(3.50)))
        .expect("first append");
    ledger
        .append(day("2024-05-10"), SaleDraft::new("Snack", dec!(2.00)))
        .expect("second append");
    assert_eq!(ledger.all().expect("all").len(), 2);

    // The only backup so far holds the state after the first append.
    let backup = store
        .list_backups()
        .expect("list backups")
        .into_iter()
        .last()
        .expect("one backup");
    let restored = store.restore_backup(&backup.name).expect("restore");
    assert_eq!(restored.len(), 1);

    let items: Vec<String> = ledger
        .all()
        .expect("all")
        .iter()
        .map(|r| r.item().to_string())
        .collect();
    assert_eq!(items, ["Juice"]);

    let err = store.restore_backup("sales_19700101_000000_000000.json");
    assert!(err.is_err());
}

#[test]
fn products_round_trip_through_products_file() {
    let dir = tempdir().expect("tempdir");
    let store = JsonStore::new(dir.path().to_path_buf()).expect("create store");
    let product = Product::new(
        ProductDraft::new("Juice", dec!(3.50)).with_category("Drinks"),
        Utc::now(),
    );
    store
        .save_products(std::slice::from_ref(&product))
        .expect("save products");

    assert!(store.products_path().exists());
    assert_eq!(store.load_products().expect("load"), vec![product]);
}
