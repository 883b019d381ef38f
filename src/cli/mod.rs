//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod alert;
pub mod allocation;
pub mod audit;
pub mod auth;
pub mod budget;
pub mod category;
pub mod config;
pub mod expense;
pub mod export;
pub mod stats;

pub use alert::{handle_alert_command, AlertCommands};
pub use allocation::{handle_allocation_command, AllocationCommands};
pub use audit::{handle_audit_command, AuditArgs};
pub use auth::{handle_auth_command, AuthCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use config::{handle_config_command, ConfigArgs};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportCommands};
pub use stats::{handle_stats_command, StatsCommands};

use chrono::NaiveDate;

use crate::error::{MoneyMateError, MoneyMateResult};
use crate::models::{Budget, BudgetMonth, Category, Money, UserId};
use crate::services::{BudgetService, CategoryService};
use crate::storage::Storage;

pub(crate) fn parse_money(s: &str) -> MoneyMateResult<Money> {
    Money::parse(s).map_err(|e| MoneyMateError::Validation(format!("Invalid amount: {}", e)))
}

pub(crate) fn parse_month(s: &str) -> MoneyMateResult<BudgetMonth> {
    BudgetMonth::parse(s).map_err(|e| MoneyMateError::Validation(e.to_string()))
}

/// Accepts ISO dates as well as the configured display format
pub(crate) fn parse_date(s: &str, date_format: &str) -> MoneyMateResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, date_format))
        .map_err(|_| {
            MoneyMateError::Validation(format!(
                "Invalid date '{}': use YYYY-MM-DD or {}",
                s, date_format
            ))
        })
}

/// A budget of the user by month or ID, the current month when omitted
pub(crate) fn resolve_budget(
    storage: &Storage,
    user_id: UserId,
    identifier: Option<&str>,
) -> MoneyMateResult<Budget> {
    let identifier = identifier.unwrap_or("current");
    BudgetService::new(storage)
        .find_for_user(user_id, identifier)?
        .ok_or_else(|| MoneyMateError::budget_not_found(identifier))
}

pub(crate) fn resolve_category(storage: &Storage, identifier: &str) -> MoneyMateResult<Category> {
    CategoryService::new(storage)
        .find(identifier)?
        .ok_or_else(|| MoneyMateError::category_not_found(identifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 10, 7).unwrap();
        assert_eq!(parse_date("2025-10-07", "%d/%m/%Y").unwrap(), expected);
        assert_eq!(parse_date("07/10/2025", "%d/%m/%Y").unwrap(), expected);
        assert!(parse_date("7th October", "%d/%m/%Y").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("12.50").unwrap().cents(), 1_250);
        assert!(parse_money("twelve").is_err());
    }
}
