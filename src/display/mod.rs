//! Display formatting for terminal output
//!
//! Provides utilities for formatting data models for terminal display,
//! including tables, progress bars, and status indicators.

pub mod alert;
pub mod budget;
pub mod category;
pub mod expense;
pub mod stats;

pub use alert::format_alert_list;
pub use budget::{format_allocation_table, format_budget_list, format_budget_overview, progress_bar};
pub use category::{format_category_details, format_category_list};
pub use expense::{format_expense_details, format_expense_list, format_expense_summary};
pub use stats::{format_monthly_totals, format_period_summary, format_top_categories};
