use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

pub const MAX_BACKUP_RETENTION: usize = 100;

/// Stores user-configurable preferences for the canteen shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "Config::default_decimal_separator")]
    pub decimal_separator: char,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for sales and products. Defaults to the
    /// platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "pt-BR".into(),
            currency_symbol: Self::default_currency_symbol(),
            decimal_separator: Self::default_decimal_separator(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            backup_retention: Self::default_backup_retention(),
            data_dir: None,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 6] = [
        "locale",
        "currency_symbol",
        "decimal_separator",
        "ui_color_enabled",
        "backup_retention",
        "data_dir",
    ];

    pub fn default_currency_symbol() -> String {
        "R$".into()
    }

    pub fn default_decimal_separator() -> char {
        ','
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    /// Data root: `override_root` (usually `CANTEEN_HOME`), then `data_dir`,
    /// then the platform data directory.
    pub fn resolve_data_dir(&self, override_root: Option<PathBuf>) -> PathBuf {
        if let Some(root) = override_root {
            return root;
        }
        if let Some(path) = &self.data_dir {
            return path.clone();
        }
        dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("canteen_ledger")
    }

    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "locale" => self.locale.clone(),
            "currency_symbol" => self.currency_symbol.clone(),
            "decimal_separator" => self.decimal_separator.to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "backup_retention" => self.backup_retention.to_string(),
            "data_dir" => self
                .data_dir
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// Updates one setting from its textual form. An empty `data_dir` clears it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };
        match key {
            "locale" => {
                if value.is_empty() {
                    return Err(invalid("must not be empty"));
                }
                self.locale = value.to_string();
            }
            "currency_symbol" => {
                if value.is_empty() {
                    return Err(invalid("must not be empty"));
                }
                self.currency_symbol = value.to_string();
            }
            "decimal_separator" => match value {
                "," => self.decimal_separator = ',',
                "." => self.decimal_separator = '.',
                _ => return Err(invalid("expected `,` or `.`")),
            },
            "ui_color_enabled" => {
                self.ui_color_enabled = match value.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" => true,
                    "false" | "off" | "no" => false,
                    _ => return Err(invalid("expected on or off")),
                };
            }
            "backup_retention" => {
                let retention: usize = value.parse().map_err(|_| invalid("not a number"))?;
                if !(1..=MAX_BACKUP_RETENTION).contains(&retention) {
                    return Err(invalid("must be between 1 and 100"));
                }
                self.backup_retention = retention;
            }
            "data_dir" => {
                self.data_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}
