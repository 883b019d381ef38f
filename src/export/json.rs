//! JSON Export functionality
//!
//! Exports the complete database to JSON format with schema versioning.
//! Password hashes are left out.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MoneyMateError, MoneyMateResult};
use crate::models::{Alert, Budget, BudgetCategory, Category, Expense, User, UserId};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// A user as exported: everything but the credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub alert_threshold: f64,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl From<&User> for ExportedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            alert_threshold: user.alert_threshold,
            created_at: user.created_at,
            last_login: user.last_login,
            is_active: user.is_active,
        }
    }
}

/// Full database export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub users: Vec<ExportedUser>,
    pub budgets: Vec<Budget>,
    pub categories: Vec<Category>,
    pub allocations: Vec<BudgetCategory>,
    pub expenses: Vec<Expense>,
    pub alerts: Vec<Alert>,

    /// Export metadata
    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub user_count: usize,
    pub budget_count: usize,
    pub category_count: usize,
    pub allocation_count: usize,
    pub expense_count: usize,
    pub alert_count: usize,

    /// Date range of expenses (earliest)
    pub earliest_expense: Option<String>,

    /// Date range of expenses (latest)
    pub latest_expense: Option<String>,
}

impl FullExport {
    /// Create a new full export from storage
    pub fn from_storage(storage: &Storage) -> MoneyMateResult<Self> {
        let users: Vec<ExportedUser> = storage.users.get_all()?.iter().map(Into::into).collect();
        let budgets = storage.budgets.get_all()?;
        let categories = storage.categories.get_all()?;
        let allocations = storage.budget_categories.get_all()?;
        let expenses = storage.expenses.get_all()?;
        let alerts = storage.alerts.get_all()?;

        let metadata = ExportMetadata {
            user_count: users.len(),
            budget_count: budgets.len(),
            category_count: categories.len(),
            allocation_count: allocations.len(),
            expense_count: expenses.len(),
            alert_count: alerts.len(),
            earliest_expense: expenses.iter().map(|e| e.date).min().map(|d| d.to_string()),
            latest_expense: expenses.iter().map(|e| e.date).max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            users,
            budgets,
            categories,
            allocations,
            expenses,
            alerts,
            metadata,
        })
    }

    /// Check the schema version and that references resolve
    ///
    /// Expenses may point at deleted categories; that is not an error.
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let user_ids: HashSet<_> = self.users.iter().map(|u| u.id).collect();
        let budget_ids: HashSet<_> = self.budgets.iter().map(|b| b.id).collect();
        let category_ids: HashSet<_> = self.categories.iter().map(|c| c.id).collect();

        for budget in &self.budgets {
            if !user_ids.contains(&budget.user_id) {
                return Err(format!(
                    "Budget {} references unknown user {}",
                    budget.id, budget.user_id
                ));
            }
        }

        for link in &self.allocations {
            if !budget_ids.contains(&link.budget_id) {
                return Err(format!(
                    "Allocation {} references unknown budget {}",
                    link.id, link.budget_id
                ));
            }
            if !category_ids.contains(&link.category_id) {
                return Err(format!(
                    "Allocation {} references unknown category {}",
                    link.id, link.category_id
                ));
            }
        }

        for expense in &self.expenses {
            if !budget_ids.contains(&expense.budget_id) {
                return Err(format!(
                    "Expense {} references unknown budget {}",
                    expense.id, expense.budget_id
                ));
            }
        }

        Ok(())
    }
}

/// Export the full database to JSON format
pub fn export_full_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> MoneyMateResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| MoneyMateError::Export(e.to_string()))?;

    Ok(())
}

/// Read back a JSON export, checking it before returning
pub fn import_from_json(json_str: &str) -> MoneyMateResult<FullExport> {
    let export: FullExport =
        serde_json::from_str(json_str).map_err(|e| MoneyMateError::Export(e.to_string()))?;

    export.validate().map_err(MoneyMateError::Export)?;

    Ok(export)
}
