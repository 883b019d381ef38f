//! Export module for MoneyMate
//!
//! Provides data export in multiple formats:
//! - CSV: expenses and allocations (spreadsheet-compatible)
//! - JSON: machine-readable full database export
//! - YAML: human-readable full database export

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_allocations_csv, export_expenses_csv, export_user_expenses_csv};
pub use self::json::{export_full_json, import_from_json, ExportedUser, FullExport, EXPORT_SCHEMA_VERSION};
pub use self::yaml::{export_full_yaml, import_from_yaml};
