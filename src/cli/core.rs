//! CLI dispatch, errors and shell context helpers.

use std::{env, io, path::PathBuf};

use canteen_config::{ConfigError, ConfigManager, HOME_ENV};
use canteen_core::{
    CatalogService, CoreError, CurrencyFormatter, DateFormatter, SalesLedger, ValidationError,
};
use canteen_domain::{DateRange, DayKey, MonthKey, Product, SaleId, SaleRecord};
use canteen_storage_json::JsonStore;
use dialoguer::theme::ColorfulTheme;
use rust_decimal::Decimal;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use tracing::debug;
use uuid::Uuid;

use super::commands;
use super::formatters::CliFormatters;
use super::io as cli_io;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};
use super::system_clock::SystemClock;
pub use crate::cli::shell_context::{CliMode, ShellContext};

/// Shortest id prefix accepted when referring to a sale.
const MIN_ID_PREFIX: usize = 4;
const SHORT_ID_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    /// Opens the shell on the configured data directory. `CANTEEN_HOME`
    /// relocates both the configuration and the data.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(ConfigManager::default_base_dir())?;
        let data_override = env::var_os(HOME_ENV).map(PathBuf::from);
        Self::open(mode, config_manager, data_override)
    }

    pub(crate) fn open(
        mode: CliMode,
        config_manager: ConfigManager,
        data_override: Option<PathBuf>,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config = config_manager.load()?;
        let root = config.resolve_data_dir(data_override);
        let store = JsonStore::with_retention(root, config.backup_retention)?;
        debug!(root = %store.root().display(), "opened data directory");

        let ledger = SalesLedger::new(Box::new(store.clone()), Box::new(SystemClock));
        let catalog = CatalogService::new(Box::new(store.clone()), Box::new(SystemClock));
        let selected_day = ledger.today();

        let context = ShellContext {
            mode,
            registry,
            ledger,
            catalog,
            store,
            theme: ColorfulTheme::default(),
            formatters: CliFormatters::from_config(&config),
            config_manager,
            config,
            selected_day,
            selected_month: selected_day.month(),
            last_command: None,
            running: true,
        };
        context.apply_output_preferences();
        Ok(context)
    }

    pub(crate) fn prompt(&self) -> String {
        format!("canteen [{}]> ", self.selected_day)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = crate::cli::shell::parse_command_line(line)
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&raw.to_lowercase(), raw, &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{name}`?"));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    /// Asks before a destructive action. Scripts always proceed.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            CommandError::Core(CoreError::Validation(err)) => {
                cli_io::print_error(format!("Invalid input: {err}"));
            }
            CommandError::Core(CoreError::NotFound(id)) => {
                cli_io::print_error(format!("No sale matches `{id}`."));
                cli_io::print_hint("Use `list` to see the sales of the selected day.");
            }
            other => cli_io::print_error(other.to_string()),
        }
        Ok(())
    }

    pub(crate) fn apply_output_preferences(&self) {
        output::set_color_enabled(self.config.ui_color_enabled && self.mode == CliMode::Interactive);
    }

    /// Saves the configuration and refreshes everything derived from it.
    pub(crate) fn persist_config(&mut self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        self.formatters = CliFormatters::from_config(&self.config);
        self.apply_output_preferences();
        Ok(())
    }

    pub(crate) fn money(&self, amount: Decimal) -> String {
        self.formatters.format_amount(amount)
    }

    pub(crate) fn display_day(&self, day: DayKey) -> String {
        format!("{} ({})", self.formatters.format_day(day), day.weekday())
    }

    pub(crate) fn select_day(&mut self, day: DayKey) {
        self.selected_day = day;
        self.selected_month = day.month();
    }

    /// Resolves `#N` (position in the selected day), a full id or a unique id prefix.
    pub(crate) fn resolve_sale(&self, reference: &str) -> Result<SaleRecord, CommandError> {
        let reference = reference.trim();
        if let Some(position) = reference.strip_prefix('#') {
            let index: usize = position.parse().map_err(|_| {
                CommandError::InvalidArguments(format!("`{reference}` is not a valid position"))
            })?;
            let records = self.ledger.query_by_day(self.selected_day)?;
            return index
                .checked_sub(1)
                .and_then(|index| records.get(index).cloned())
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "no sale #{index} on {}",
                        self.selected_day
                    ))
                });
        }

        let records = self.ledger.all()?;
        if let Some(record) = records.iter().find(|record| record.id().as_str() == reference) {
            return Ok(record.clone());
        }
        if reference.len() >= MIN_ID_PREFIX {
            let mut matches = records
                .iter()
                .filter(|record| record.id().as_str().starts_with(reference));
            if let Some(first) = matches.next() {
                if matches.next().is_some() {
                    return Err(CommandError::InvalidArguments(format!(
                        "id prefix `{reference}` matches several sales"
                    )));
                }
                return Ok(first.clone());
            }
        }
        Err(CoreError::NotFound(SaleId::new(reference)).into())
    }

    /// Resolves a product by id or by case-insensitive name, inactive ones included.
    pub(crate) fn resolve_product(&self, reference: &str) -> Result<Product, CommandError> {
        if let Ok(id) = Uuid::parse_str(reference.trim()) {
            return Ok(self.catalog.get(id)?);
        }
        self.catalog
            .all()?
            .into_iter()
            .find(|product| product.matches_name(reference))
            .ok_or_else(|| CommandError::Message(format!("No product named `{reference}`.")))
    }

    /// No arguments: the selected month. One: a month or a single day. Two: an
    /// inclusive day range.
    pub(crate) fn range_from_args(&self, args: &[&str]) -> Result<DateRange, CommandError> {
        match args {
            [] => Ok(self.selected_month.range()),
            [single] => {
                if let Ok(month) = single.parse::<MonthKey>() {
                    Ok(month.range())
                } else {
                    let day = canteen_core::validation::parse_day(single)?;
                    Ok(DateRange::single(day))
                }
            }
            [start, end] => {
                let start = canteen_core::validation::parse_day(start)?;
                let end = canteen_core::validation::parse_day(end)?;
                Ok(DateRange::new(start, end).map_err(ValidationError::from)?)
            }
            _ => Err(CommandError::InvalidArguments(
                "expected [YYYY-MM | YYYY-MM-DD | <start> <end>]".into(),
            )),
        }
    }
}

pub(crate) fn short_id(id: &SaleId) -> String {
    id.as_str().chars().take(SHORT_ID_LEN).collect()
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ValidationError> for CommandError {
    fn from(err: ValidationError) -> Self {
        CommandError::Core(CoreError::Validation(err))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_script(
    base: &std::path::Path,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let manager = ConfigManager::with_base_dir(base.to_path_buf())?;
    let mut app = ShellContext::open(CliMode::Script, manager, Some(base.to_path_buf()))?;
    for line in lines {
        match app.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => app.report_error(err)?,
        }
    }
    Ok(app)
}
