//! Path management for MoneyMate
//!
//! ## Path Resolution Order
//!
//! 1. `MONEYMATE_DATA_DIR` environment variable (if set)
//! 2. The platform config directory (`~/.config/moneymate` on Linux,
//!    `~/Library/Application Support/moneymate` on macOS, `%APPDATA%\moneymate`
//!    on Windows)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::MoneyMateError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "MONEYMATE_DATA_DIR";

/// Manages all paths used by MoneyMate
#[derive(Debug, Clone)]
pub struct MoneyMatePaths {
    base_dir: PathBuf,
}

impl MoneyMatePaths {
    /// Create a new MoneyMatePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, MoneyMateError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create MoneyMatePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (<base>/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the login session file
    pub fn session_file(&self) -> PathBuf {
        self.base_dir.join("session.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    /// Get the path to budget_categories.json (budget/category allocations)
    pub fn budget_categories_file(&self) -> PathBuf {
        self.data_dir().join("budget_categories.json")
    }

    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    pub fn alerts_file(&self) -> PathBuf {
        self.data_dir().join("alerts.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), MoneyMateError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| MoneyMateError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| MoneyMateError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if MoneyMate has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, MoneyMateError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| MoneyMateError::Config("Could not determine home directory".into()))?;
    Ok(dirs.config_dir().join("moneymate"))
}
