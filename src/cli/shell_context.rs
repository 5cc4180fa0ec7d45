//! Shared runtime state for CLI interactions and command execution.

use canteen_config::{Config, ConfigManager};
use canteen_core::{CatalogService, SalesLedger};
use canteen_domain::{DayKey, MonthKey};
use canteen_storage_json::JsonStore;
use dialoguer::theme::ColorfulTheme;

use super::{formatters::CliFormatters, registry::CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub ledger: SalesLedger,
    pub catalog: CatalogService,
    pub store: JsonStore,
    pub theme: ColorfulTheme,
    pub formatters: CliFormatters,
    pub config_manager: ConfigManager,
    pub config: Config,
    /// Day that new sales are recorded on and that day views show.
    pub selected_day: DayKey,
    /// Month used by month views and as the default analytics range.
    pub selected_month: MonthKey,
    pub last_command: Option<String>,
    pub running: bool,
}
