#![doc(test(attr(deny(warnings))))]

//! Canteen Ledger records the daily sales of a school canteen and reports
//! daily, monthly and analytical totals over them.

pub mod cli;
pub mod utils;

pub use canteen_config as config;
pub use canteen_core as core;
pub use canteen_domain as domain;
pub use canteen_storage_json as storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Canteen ledger tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
