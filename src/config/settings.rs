//! User settings for MoneyMate
//!
//! Manages user preferences: currency display, date format and the defaults
//! applied to new users and new budget allocations.

use serde::{Deserialize, Serialize};

use super::paths::MoneyMatePaths;
use crate::error::MoneyMateError;

/// User settings for MoneyMate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Alert threshold given to newly registered users (fraction of spend)
    #[serde(default = "default_alert_threshold")]
    pub default_alert_threshold: f64,

    /// Percentage used when a category is linked to a budget without one
    #[serde(default = "default_allocation_percentage")]
    pub default_allocation_percentage: f64,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "€".to_string()
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

fn default_alert_threshold() -> f64 {
    0.8
}

fn default_allocation_percentage() -> f64 {
    10.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            default_alert_threshold: default_alert_threshold(),
            default_allocation_percentage: default_allocation_percentage(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &MoneyMatePaths) -> Result<Self, MoneyMateError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                MoneyMateError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                MoneyMateError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &MoneyMatePaths) -> Result<(), MoneyMateError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            MoneyMateError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| MoneyMateError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject values the services cannot work with
    pub fn validate(&self) -> Result<(), MoneyMateError> {
        if !(self.default_alert_threshold > 0.0 && self.default_alert_threshold <= 1.0) {
            return Err(MoneyMateError::Config(format!(
                "default_alert_threshold must be in (0, 1], got {}",
                self.default_alert_threshold
            )));
        }

        if !(self.default_allocation_percentage > 0.0
            && self.default_allocation_percentage <= 100.0)
        {
            return Err(MoneyMateError::Config(format!(
                "default_allocation_percentage must be in (0, 100], got {}",
                self.default_allocation_percentage
            )));
        }

        Ok(())
    }
}
