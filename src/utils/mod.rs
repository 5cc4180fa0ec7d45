pub mod build_info;

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "warn,canteen_ledger=info,canteen_core=info,canteen_storage_json=info";

/// Initializes the global tracing subscriber. `RUST_LOG` overrides the default
/// filter. Logs go to stderr.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
