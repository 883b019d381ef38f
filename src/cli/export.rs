//! CLI commands for data export
//!
//! Provides commands for exporting data in various formats.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::{Subcommand, ValueEnum};

use crate::error::{MoneyMateError, MoneyMateResult};
use crate::export::{csv, json, yaml};
use crate::services::AuthService;
use crate::storage::Storage;

/// Full export formats
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-readable)
    Yaml,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export the whole database
    All {
        /// Output file path
        output: PathBuf,

        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export your expenses to CSV
    Expenses {
        /// Output file path
        output: PathBuf,
    },

    /// Export your budget allocations to CSV
    Allocations {
        /// Output file path
        output: PathBuf,
    },
}

fn create_output(path: &Path) -> MoneyMateResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        MoneyMateError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> MoneyMateResult<()> {
    match cmd {
        ExportCommands::All {
            output,
            format,
            pretty,
        } => {
            let mut writer = create_output(&output)?;
            match format {
                ExportFormat::Json => json::export_full_json(storage, &mut writer, pretty)?,
                ExportFormat::Yaml => yaml::export_full_yaml(storage, &mut writer)?,
            }
            println!("Full database exported to: {}", output.display());
        }

        ExportCommands::Expenses { output } => {
            let user = AuthService::new(storage).require_user()?;
            let count = csv::export_user_expenses_csv(storage, user.id, create_output(&output)?)?;
            println!("Exported {} expenses to: {}", count, output.display());
        }

        ExportCommands::Allocations { output } => {
            let user = AuthService::new(storage).require_user()?;
            let count = csv::export_allocations_csv(storage, user.id, create_output(&output)?)?;
            println!("Exported {} allocations to: {}", count, output.display());
        }
    }

    Ok(())
}
