use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::{
    catalog_service::CatalogService, ledger_service::SalesLedger, storage::MemoryStore,
    time::Clock, CoreError, ValidationError,
};
use canteen_domain::{DayKey, MonthKey, ProductDraft, ProductPatch, SaleDraft, SaleId, SalePatch};

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn clock() -> Box<FixedClock> {
    Box::new(FixedClock(
        Utc.with_ymd_and_hms(2024, 5, 31, 9, 30, 0).unwrap(),
    ))
}

fn ledger() -> SalesLedger {
    SalesLedger::new(Box::new(MemoryStore::new()), clock())
}

fn catalog() -> CatalogService {
    CatalogService::new(Box::new(MemoryStore::new()), clock())
}

fn day(raw: &str) -> DayKey {
    raw.parse().expect("valid day")
}

fn month(raw: &str) -> MonthKey {
    raw.parse().expect("valid month")
}

#[test]
fn juice_and_snack_accumulate_on_the_same_day() {
    let ledger = ledger();
    let may_10 = day("2024-05-10");

    let juice = ledger
        .append(may_10, SaleDraft::new("Juice", dec!(3.50)).with_quantity(2))
        .expect("append juice");
    assert_eq!(juice.total(), dec!(7.00));
    assert_eq!(ledger.daily_total(may_10).unwrap(), dec!(7.00));

    let snack = ledger
        .append(may_10, SaleDraft::new("Snack", dec!(2.00)))
        .expect("append snack");
    assert_eq!(snack.quantity(), 1);
    assert_eq!(ledger.daily_total(may_10).unwrap(), dec!(9.00));

    let items: Vec<String> = ledger
        .query_by_day(may_10)
        .unwrap()
        .iter()
        .map(|record| record.item().to_string())
        .collect();
    assert_eq!(items, ["Juice", "Snack"]);
}

#[test]
fn month_report_groups_days_newest_first() {
    let ledger = ledger();
    ledger
        .append(day("2024-05-10"), SaleDraft::new("Juice", dec!(3.50)).with_quantity(2))
        .unwrap();
    ledger
        .append(day("2024-05-10"), SaleDraft::new("Snack", dec!(2.00)))
        .unwrap();
    ledger
        .append(day("2024-05-20"), SaleDraft::new("Lunch", dec!(10.00)))
        .unwrap();
    ledger
        .append(day("2024-04-30"), SaleDraft::new("Lunch", dec!(10.00)))
        .unwrap();

    let may = month("2024-05");
    assert_eq!(ledger.monthly_total(may).unwrap(), dec!(19.00));

    let buckets = ledger.group_by_day_within_month(may).unwrap();
    let days: Vec<String> = buckets.iter().map(|b| b.day.to_string()).collect();
    assert_eq!(days, ["2024-05-20", "2024-05-10"]);
    assert_eq!(buckets[1].records.len(), 2);
    assert_eq!(buckets[1].total, dec!(9.00));

    let bucket_sum: Decimal = buckets.iter().map(|b| b.total).sum();
    assert_eq!(bucket_sum, ledger.monthly_total(may).unwrap());

    let ordered: Vec<String> = ledger
        .query_by_month(may)
        .unwrap()
        .iter()
        .map(|r| format!("{} {}", r.date(), r.item()))
        .collect();
    assert_eq!(
        ordered,
        ["2024-05-20 Lunch", "2024-05-10 Juice", "2024-05-10 Snack"]
    );
}

#[test]
fn empty_item_is_rejected_without_touching_the_collection() {
    let ledger = ledger();
    ledger
        .append(day("2024-05-10"), SaleDraft::new("Juice", dec!(3.50)))
        .unwrap();

    let err = ledger
        .append(day("2024-05-10"), SaleDraft::new("   ", dec!(1.00)))
        .expect_err("blank item must fail");
    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::EmptyItem)
    ));
    assert_eq!(ledger.all().unwrap().len(), 1);
}

#[test]
fn non_positive_price_and_quantity_are_rejected() {
    let ledger = ledger();
    let may_10 = day("2024-05-10");
    assert!(ledger
        .append(may_10, SaleDraft::new("Juice", dec!(0)))
        .unwrap_err()
        .is_validation());
    assert!(ledger
        .append(may_10, SaleDraft::new("Juice", dec!(1.00)).with_quantity(0))
        .unwrap_err()
        .is_validation());
    assert!(ledger.all().unwrap().is_empty());
}

#[test]
fn appended_records_have_unique_ids_and_matching_fields() {
    let ledger = ledger();
    let may_10 = day("2024-05-10");
    let first = ledger
        .append(may_10, SaleDraft::new(" Tea ", dec!(1.25)).with_quantity(3))
        .unwrap();
    let second = ledger
        .append(may_10, SaleDraft::new("Tea", dec!(1.25)))
        .unwrap();
    assert_ne!(first.id(), second.id());

    let stored = ledger.get(first.id()).unwrap();
    assert_eq!(stored.item(), "Tea");
    assert_eq!(stored.date(), may_10);
    assert_eq!(stored.unit_price(), dec!(1.25));
    assert_eq!(stored.quantity(), 3);
    assert_eq!(stored.total(), dec!(3.75));
    assert!(stored.updated_at().is_none());
}

#[test]
fn update_recomputes_total_and_keeps_date() {
    let ledger = ledger();
    let sale = ledger
        .append(day("2024-05-10"), SaleDraft::new("Juice", dec!(3.50)))
        .unwrap();

    let updated = ledger
        .update(sale.id(), SalePatch::default().unit_price(dec!(4.00)).quantity(3))
        .unwrap();
    assert_eq!(updated.total(), dec!(12.00));
    assert_eq!(updated.date(), sale.date());
    assert_eq!(updated.item(), "Juice");
    assert!(updated.updated_at().is_some());

    let stored = ledger.get(sale.id()).unwrap();
    assert_eq!(stored.total(), stored.unit_price() * Decimal::from(stored.quantity()));
}

#[test]
fn invalid_patch_leaves_record_unchanged() {
    let ledger = ledger();
    let sale = ledger
        .append(day("2024-05-10"), SaleDraft::new("Juice", dec!(3.50)))
        .unwrap();

    let err = ledger
        .update(sale.id(), SalePatch::default().item(""))
        .unwrap_err();
    assert!(err.is_validation());
    let err = ledger.update(sale.id(), SalePatch::default()).unwrap_err();
    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::EmptyPatch)
    ));
    assert_eq!(ledger.get(sale.id()).unwrap(), sale);
}

#[test]
fn deleting_unknown_id_keeps_existing_records() {
    let ledger = ledger();
    let kept = ledger
        .append(day("2024-05-10"), SaleDraft::new("Juice", dec!(3.50)))
        .unwrap();
    let gone = ledger
        .append(day("2024-05-10"), SaleDraft::new("Snack", dec!(2.00)))
        .unwrap();

    ledger.delete(gone.id()).unwrap();
    let err = ledger.delete(&SaleId::new("nope")).unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));

    let remaining = ledger.all().unwrap();
    assert_eq!(remaining, vec![kept]);
    assert!(ledger.delete(gone.id()).unwrap_err().is_not_found());
}

#[test]
fn summaries_count_sales_and_units() {
    let ledger = ledger();
    ledger
        .append(day("2024-05-10"), SaleDraft::new("Juice", dec!(3.50)).with_quantity(2))
        .unwrap();
    ledger
        .append(day("2024-05-11"), SaleDraft::new("Snack", dec!(2.00)))
        .unwrap();

    let summary = ledger.day_summary(day("2024-05-10")).unwrap();
    assert_eq!(summary.sale_count, 1);
    assert_eq!(summary.units_sold, 2);
    assert_eq!(summary.total, dec!(7.00));

    let summary = ledger.month_summary(month("2024-05")).unwrap();
    assert_eq!(summary.sale_count, 2);
    assert_eq!(summary.units_sold, 3);
    assert_eq!(summary.total, dec!(9.00));

    let empty = ledger.day_summary(day("2024-05-01")).unwrap();
    assert_eq!(empty.total, Decimal::ZERO);
    assert_eq!(empty.sale_count, 0);
}

#[test]
fn catalog_rejects_duplicate_names_case_insensitively() {
    let catalog = catalog();
    catalog
        .add(ProductDraft::new("Orange Juice", dec!(5.00)).with_category("Drinks"))
        .unwrap();
    let err = catalog
        .add(ProductDraft::new("orange juice ", dec!(4.00)))
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::DuplicateProduct(_))
    ));
    assert_eq!(catalog.all().unwrap().len(), 1);
}

#[test]
fn catalog_lists_sorted_and_filters_inactive() {
    let catalog = catalog();
    let water = catalog
        .add(ProductDraft::new("Water", dec!(2.00)).with_category("Drinks"))
        .unwrap();
    catalog
        .add(ProductDraft::new("cake", dec!(6.00)).with_category("Bakery"))
        .unwrap();
    catalog
        .add(ProductDraft::new("Apple Juice", dec!(5.00)).with_category("Drinks"))
        .unwrap();

    let names: Vec<String> = catalog
        .list(false, None)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["Apple Juice", "cake", "Water"]);

    let deactivated = catalog.deactivate(water.id).unwrap();
    assert!(!deactivated.active);
    let drinks: Vec<String> = catalog
        .list(true, Some("drinks"))
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(drinks, ["Apple Juice"]);
    assert!(catalog.find_by_name("water").unwrap().is_none());
    assert_eq!(catalog.categories().unwrap(), ["Bakery", "Drinks"]);
}

#[test]
fn catalog_update_validates_and_reports_missing_products() {
    let catalog = catalog();
    let cake = catalog.add(ProductDraft::new("Cake", dec!(6.00))).unwrap();
    catalog.add(ProductDraft::new("Pie", dec!(7.00))).unwrap();

    let renamed = catalog
        .update(
            cake.id,
            ProductPatch {
                name: Some("Carrot Cake".into()),
                default_price: Some(dec!(6.50)),
                ..ProductPatch::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.name, "Carrot Cake");
    assert_eq!(
        catalog.find_by_name("carrot cake").unwrap().map(|p| p.default_price),
        Some(dec!(6.50))
    );

    let clash = catalog
        .update(
            cake.id,
            ProductPatch {
                name: Some("PIE".into()),
                ..ProductPatch::default()
            },
        )
        .unwrap_err();
    assert!(clash.is_validation());

    let missing = catalog.deactivate(Uuid::new_v4()).unwrap_err();
    assert!(matches!(missing, CoreError::ProductNotFound(_)));
}
