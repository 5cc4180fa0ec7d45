//! The sales ledger: sole owner of the persisted sale collection.

use std::collections::{BTreeMap, HashSet};

use canteen_domain::{
    DateRange, DayBucket, DayKey, DaySummary, MonthKey, MonthSummary, SaleDraft, SaleId,
    SalePatch, SaleRecord,
};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::{
    storage::{snapshot_warnings, SaleStore},
    time::Clock,
    validation, CoreError, ValidationError,
};

/// Validated CRUD and aggregate queries over the sale collection.
///
/// Every call re-reads the persisted snapshot. Mutations write the full
/// updated collection back before returning.
pub struct SalesLedger {
    store: Box<dyn SaleStore>,
    clock: Box<dyn Clock>,
}

impl SalesLedger {
    pub fn new(store: Box<dyn SaleStore>, clock: Box<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn today(&self) -> DayKey {
        self.clock.today()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Loads the snapshot with every cached total recomputed.
    fn snapshot(&self) -> Result<Vec<SaleRecord>, CoreError> {
        let mut records = self.store.load_sales()?;
        for record in &mut records {
            record.refresh_total();
        }
        debug!(count = records.len(), "loaded sales snapshot");
        Ok(records)
    }

    /// Returns the whole collection in insertion order.
    pub fn all(&self) -> Result<Vec<SaleRecord>, CoreError> {
        self.snapshot()
    }

    pub fn get(&self, id: &SaleId) -> Result<SaleRecord, CoreError> {
        self.snapshot()?
            .into_iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| CoreError::NotFound(id.clone()))
    }

    /// Creates a record on `day` and persists it.
    pub fn append(&self, day: DayKey, draft: SaleDraft) -> Result<SaleRecord, CoreError> {
        let draft = validation::validate_draft(&draft)?;
        let today = self.clock.today();
        if day > today {
            return Err(ValidationError::FutureDate { day, today }.into());
        }

        let mut records = self.snapshot()?;
        let taken: HashSet<&SaleId> = records.iter().map(SaleRecord::id).collect();
        let mut id = SaleId::generate();
        while taken.contains(&id) {
            id = SaleId::generate();
        }

        let record = SaleRecord::new(
            id,
            day,
            draft.item,
            draft.unit_price,
            draft.quantity,
            self.clock.now(),
        );
        records.push(record.clone());
        self.store.save_sales(&records)?;
        info!(id = %record.id(), day = %day, total = %record.total(), "sale appended");
        Ok(record)
    }

    /// Merges `patch` into the record identified by `id` and persists it.
    pub fn update(&self, id: &SaleId, patch: SalePatch) -> Result<SaleRecord, CoreError> {
        let patch = validation::validate_patch(&patch)?;
        let mut records = self.snapshot()?;
        let record = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| CoreError::NotFound(id.clone()))?;
        record.apply(&patch, self.clock.now());
        let updated = record.clone();
        self.store.save_sales(&records)?;
        info!(id = %id, total = %updated.total(), "sale updated");
        Ok(updated)
    }

    /// Removes the record identified by `id`, returning it.
    pub fn delete(&self, id: &SaleId) -> Result<SaleRecord, CoreError> {
        let mut records = self.snapshot()?;
        let index = records
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| CoreError::NotFound(id.clone()))?;
        let removed = records.remove(index);
        self.store.save_sales(&records)?;
        info!(id = %id, "sale deleted");
        Ok(removed)
    }

    /// Records dated `day`, in insertion order.
    pub fn query_by_day(&self, day: DayKey) -> Result<Vec<SaleRecord>, CoreError> {
        Ok(self
            .snapshot()?
            .into_iter()
            .filter(|record| record.date() == day)
            .collect())
    }

    /// Records within `month`, newest day first. Insertion order holds within a day.
    pub fn query_by_month(&self, month: MonthKey) -> Result<Vec<SaleRecord>, CoreError> {
        let mut records: Vec<SaleRecord> = self
            .snapshot()?
            .into_iter()
            .filter(|record| month.contains(record.date()))
            .collect();
        records.sort_by(|a, b| b.date().cmp(&a.date()));
        Ok(records)
    }

    /// Records within `range`, oldest day first.
    pub fn query_range(&self, range: DateRange) -> Result<Vec<SaleRecord>, CoreError> {
        let mut records: Vec<SaleRecord> = self
            .snapshot()?
            .into_iter()
            .filter(|record| range.contains(record.date()))
            .collect();
        records.sort_by_key(SaleRecord::date);
        Ok(records)
    }

    pub fn daily_total(&self, day: DayKey) -> Result<Decimal, CoreError> {
        Ok(sum_totals(&self.query_by_day(day)?))
    }

    pub fn monthly_total(&self, month: MonthKey) -> Result<Decimal, CoreError> {
        Ok(sum_totals(&self.query_by_month(month)?))
    }

    pub fn day_summary(&self, day: DayKey) -> Result<DaySummary, CoreError> {
        let records = self.query_by_day(day)?;
        Ok(DaySummary {
            day,
            total: sum_totals(&records),
            sale_count: records.len(),
            units_sold: sum_units(&records),
        })
    }

    pub fn month_summary(&self, month: MonthKey) -> Result<MonthSummary, CoreError> {
        let records = self.query_by_month(month)?;
        Ok(MonthSummary {
            month,
            total: sum_totals(&records),
            sale_count: records.len(),
            units_sold: sum_units(&records),
        })
    }

    /// Partitions the month's records by exact date, newest day first.
    pub fn group_by_day_within_month(&self, month: MonthKey) -> Result<Vec<DayBucket>, CoreError> {
        let mut buckets: BTreeMap<DayKey, Vec<SaleRecord>> = BTreeMap::new();
        for record in self.query_by_month(month)? {
            buckets.entry(record.date()).or_default().push(record);
        }
        Ok(buckets
            .into_iter()
            .rev()
            .map(|(day, records)| DayBucket {
                day,
                total: sum_totals(&records),
                records,
            })
            .collect())
    }

    /// Inspects the raw persisted snapshot, before totals are recomputed.
    pub fn integrity_warnings(&self) -> Result<Vec<String>, CoreError> {
        let warnings = snapshot_warnings(&self.store.load_sales()?);
        for message in &warnings {
            warn!("{message}");
        }
        Ok(warnings)
    }
}

pub fn sum_totals(records: &[SaleRecord]) -> Decimal {
    records.iter().map(SaleRecord::total).sum()
}

pub fn sum_units(records: &[SaleRecord]) -> u64 {
    records.iter().map(|record| u64::from(record.quantity())).sum()
}
