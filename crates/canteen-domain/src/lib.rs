//! canteen-domain
//!
//! Pure domain models for the canteen ledger (sale records, calendar keys,
//! catalog products and report rows). No I/O, no CLI, no storage.

pub mod keys;
pub mod product;
pub mod report;
pub mod sale;

pub use keys::*;
pub use product::*;
pub use report::*;
pub use sale::*;
