use canteen_ledger::core::{AnalyticsService, CatalogService, Clock, SalesLedger};
use canteen_ledger::domain::{DayKey, MonthKey, ProductDraft, SaleDraft, SalePatch};
use canteen_ledger::storage::JsonStore;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;
use tempfile::TempDir;

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn clock() -> Box<FixedClock> {
    Box::new(FixedClock(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()))
}

fn open(dir: &TempDir) -> (SalesLedger, CatalogService, JsonStore) {
    let store = JsonStore::with_retention(dir.path().to_path_buf(), 3).unwrap();
    let ledger = SalesLedger::new(Box::new(store.clone()), clock());
    let catalog = CatalogService::new(Box::new(store.clone()), clock());
    (ledger, catalog, store)
}

fn day(raw: &str) -> DayKey {
    raw.parse().unwrap()
}

fn month(raw: &str) -> MonthKey {
    raw.parse().unwrap()
}

#[test]
fn a_month_of_sales_is_reported_by_day() {
    let dir = TempDir::new().unwrap();
    let (ledger, _, _) = open(&dir);

    ledger
        .append(day("2024-05-20"), SaleDraft::new("Lunch", dec!(12.00)))
        .unwrap();
    ledger
        .append(day("2024-05-03"), SaleDraft::new("Juice", dec!(3.50)).with_quantity(2))
        .unwrap();
    ledger
        .append(day("2024-05-03"), SaleDraft::new("Snack", dec!(2.25)))
        .unwrap();
    ledger
        .append(day("2024-06-01"), SaleDraft::new("Juice", dec!(3.50)))
        .unwrap();

    let buckets = ledger.group_by_day_within_month(month("2024-05")).unwrap();
    let days: Vec<String> = buckets.iter().map(|bucket| bucket.day.to_string()).collect();
    assert_eq!(days, ["2024-05-20", "2024-05-03"]);
    assert_eq!(buckets[1].total, dec!(9.25));
    assert_eq!(ledger.monthly_total(month("2024-05")).unwrap(), dec!(21.25));
    assert_eq!(ledger.monthly_total(month("2024-06")).unwrap(), dec!(3.50));
}

#[test]
fn reopening_the_store_keeps_every_edit() {
    let dir = TempDir::new().unwrap();
    let id = {
        let (ledger, _, _) = open(&dir);
        let record = ledger
            .append(day("2024-06-10"), SaleDraft::new("Tea", dec!(1.50)))
            .unwrap();
        ledger
            .update(record.id(), SalePatch::default().quantity(4))
            .unwrap();
        record.id().clone()
    };

    let (ledger, _, store) = open(&dir);
    let record = ledger.get(&id).unwrap();
    assert_eq!(record.quantity(), 4);
    assert_eq!(record.total(), dec!(6.00));
    assert!(record.updated_at().is_some());
    assert_eq!(store.list_backups().unwrap().len(), 1);
}

#[test]
fn future_days_are_rejected() {
    let dir = TempDir::new().unwrap();
    let (ledger, _, _) = open(&dir);
    let err = ledger
        .append(day("2024-06-16"), SaleDraft::new("Tea", dec!(1.50)))
        .unwrap_err();
    assert!(err.is_validation());
    assert!(ledger.all().unwrap().is_empty());
}

#[test]
fn restoring_a_backup_undoes_a_delete() {
    let dir = TempDir::new().unwrap();
    let (ledger, _, store) = open(&dir);
    let kept = ledger
        .append(day("2024-06-10"), SaleDraft::new("Tea", dec!(1.50)))
        .unwrap();
    ledger.delete(kept.id()).unwrap();
    assert!(ledger.all().unwrap().is_empty());

    let newest = store.list_backups().unwrap().remove(0);
    let restored = store.restore_backup(&newest.name).unwrap();
    assert_eq!(restored.len(), 1);
    assert_eq!(ledger.get(kept.id()).unwrap().item(), "Tea");
}

#[test]
fn analytics_follow_the_catalog() {
    let dir = TempDir::new().unwrap();
    let (ledger, catalog, _) = open(&dir);
    catalog
        .add(ProductDraft::new("Juice", dec!(3.50)).with_category("Drinks"))
        .unwrap();
    catalog
        .add(ProductDraft::new("Pastry", dec!(5.00)).with_category("Bakery"))
        .unwrap();

    ledger
        .append(day("2024-06-03"), SaleDraft::new("Juice", dec!(3.50)).with_quantity(2))
        .unwrap();
    ledger
        .append(day("2024-06-04"), SaleDraft::new("Pastry", dec!(5.00)).with_quantity(3))
        .unwrap();
    ledger
        .append(day("2024-06-04"), SaleDraft::new("Water", dec!(2.00)))
        .unwrap();

    let records = ledger.all().unwrap();
    let june = month("2024-06").range();
    let shares = AnalyticsService::sales_by_category(&records, june, &catalog.all().unwrap());
    let names: Vec<&str> = shares.iter().map(|share| share.category.as_str()).collect();
    assert_eq!(names, ["Bakery", "Drinks", "Uncategorized"]);

    let top = AnalyticsService::top_items(&records, june, 1).unwrap();
    assert_eq!(top[0].item, "Pastry");
    assert_eq!(top[0].units_sold, 3);

    let stats = AnalyticsService::period_stats(&records, june);
    assert_eq!(stats.total, dec!(24.00));
    assert_eq!(stats.best_day, Some(day("2024-06-04")));
}
