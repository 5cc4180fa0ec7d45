//! canteen-core
//!
//! Business logic for the canteen ledger: the sales ledger, the product
//! catalog and analytics. Depends on canteen-domain. No CLI, no terminal I/O;
//! persistence is reached only through the storage traits.

pub mod analytics_service;
pub mod catalog_service;
pub mod error;
pub mod format;
pub mod ledger_service;
pub mod storage;
pub mod time;
pub mod validation;

pub use analytics_service::AnalyticsService;
pub use catalog_service::CatalogService;
pub use error::{CoreError, ValidationError};
pub use format::{CurrencyFormatter, DateFormatter};
pub use ledger_service::SalesLedger;
pub use storage::{MemoryStore, ProductStore, SaleStore};
pub use time::Clock;

#[cfg(test)]
mod tests;
