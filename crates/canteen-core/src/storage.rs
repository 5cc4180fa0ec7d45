use std::{
    collections::HashSet,
    sync::{Mutex, MutexGuard},
};

use canteen_domain::{Product, SaleRecord};

use crate::{validation, CoreError};

/// Persistence contract for the sale collection.
///
/// The whole collection is read and written as one snapshot; callers never see
/// partial writes.
pub trait SaleStore: Send + Sync {
    fn load_sales(&self) -> Result<Vec<SaleRecord>, CoreError>;
    fn save_sales(&self, records: &[SaleRecord]) -> Result<(), CoreError>;
}

/// Persistence contract for the product catalog.
pub trait ProductStore: Send + Sync {
    fn load_products(&self) -> Result<Vec<Product>, CoreError>;
    fn save_products(&self, products: &[Product]) -> Result<(), CoreError>;
}

/// Volatile store used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sales: Mutex<Vec<SaleRecord>>,
    products: Mutex<Vec<Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sales(records: Vec<SaleRecord>) -> Self {
        Self {
            sales: Mutex::new(records),
            products: Mutex::new(Vec::new()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, CoreError> {
    mutex
        .lock()
        .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))
}

impl SaleStore for MemoryStore {
    fn load_sales(&self) -> Result<Vec<SaleRecord>, CoreError> {
        Ok(lock(&self.sales)?.clone())
    }

    fn save_sales(&self, records: &[SaleRecord]) -> Result<(), CoreError> {
        *lock(&self.sales)? = records.to_vec();
        Ok(())
    }
}

impl ProductStore for MemoryStore {
    fn load_products(&self) -> Result<Vec<Product>, CoreError> {
        Ok(lock(&self.products)?.clone())
    }

    fn save_products(&self, products: &[Product]) -> Result<(), CoreError> {
        *lock(&self.products)? = products.to_vec();
        Ok(())
    }
}

/// Detects duplicate ids, stale totals and invalid fields within a raw snapshot.
pub fn snapshot_warnings(records: &[SaleRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut warnings = Vec::new();

    for record in records {
        if !seen.insert(record.id()) {
            warnings.push(format!("sale {} appears more than once", record.id()));
        }
        if !record.total_is_consistent() {
            warnings.push(format!(
                "sale {} stores total {} but price x quantity is {}",
                record.id(),
                record.total(),
                record.computed_total()
            ));
        }
        if let Err(err) = validation::validate_item(record.item()) {
            warnings.push(format!("sale {} has an invalid item: {}", record.id(), err));
        }
        if let Err(err) = validation::validate_price(record.unit_price()) {
            warnings.push(format!("sale {} has an invalid price: {}", record.id(), err));
        }
        if record.quantity() == 0 {
            warnings.push(format!("sale {} has quantity 0", record.id()));
        }
    }
    warnings
}
