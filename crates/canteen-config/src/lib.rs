//! canteen-config
//!
//! Persistent user preferences: currency rendering, colour output, backup
//! retention and the data directory.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::Config;

/// Environment variable overriding both the config and the data location.
pub const HOME_ENV: &str = "CANTEEN_HOME";
