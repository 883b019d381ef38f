//! CSV Export functionality
//!
//! Exports expenses and budget allocations to spreadsheet-friendly CSV.

use std::collections::HashMap;
use std::io::Write;

use crate::error::{MoneyMateError, MoneyMateResult};
use crate::models::{Expense, UserId};
use crate::services::ExpenseService;
use crate::storage::Storage;

fn csv_error(e: impl std::fmt::Display) -> MoneyMateError {
    MoneyMateError::Export(e.to_string())
}

/// Write expenses as CSV, returning the number of rows
pub fn export_expenses_csv<W: Write>(
    storage: &Storage,
    expenses: &[Expense],
    writer: W,
) -> MoneyMateResult<usize> {
    let category_names: HashMap<_, _> = storage
        .categories
        .get_all()?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let budget_months: HashMap<_, _> = storage
        .budgets
        .get_all()?
        .into_iter()
        .map(|b| (b.id, b.month))
        .collect();

    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["ID", "Date", "Budget", "Category", "Description", "Amount"])
        .map_err(csv_error)?;

    for expense in expenses {
        let budget = budget_months
            .get(&expense.budget_id)
            .map(|m| m.to_string())
            .unwrap_or_default();
        let category = category_names
            .get(&expense.category_id)
            .cloned()
            .unwrap_or_else(|| "(deleted)".to_string());

        out.write_record([
            expense.id.as_uuid().to_string(),
            expense.date.to_string(),
            budget,
            category,
            expense.description.clone(),
            expense.amount.to_decimal_string(),
        ])
        .map_err(csv_error)?;
    }

    out.flush().map_err(csv_error)?;
    Ok(expenses.len())
}

/// Write every expense of one user as CSV
pub fn export_user_expenses_csv<W: Write>(
    storage: &Storage,
    user_id: UserId,
    writer: W,
) -> MoneyMateResult<usize> {
    let expenses = ExpenseService::new(storage).list_for_user(user_id)?;
    export_expenses_csv(storage, &expenses, writer)
}

/// Write a user's budget allocations as CSV, returning the number of rows
pub fn export_allocations_csv<W: Write>(
    storage: &Storage,
    user_id: UserId,
    writer: W,
) -> MoneyMateResult<usize> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["Month", "Category", "Percentage", "Limit", "Spent", "Remaining"])
        .map_err(csv_error)?;

    let mut rows = 0;
    for budget in storage.budgets.get_by_user(user_id)? {
        for link in storage.budget_categories.get_by_budget(budget.id)? {
            let category = storage
                .categories
                .get(link.category_id)?
                .map(|c| c.name)
                .unwrap_or_else(|| "(deleted)".to_string());

            out.write_record([
                budget.month.to_string(),
                category,
                format!("{:.2}", link.percentage),
                link.limit_amount.to_decimal_string(),
                link.spent_amount.to_decimal_string(),
                link.remaining_amount().to_decimal_string(),
            ])
            .map_err(csv_error)?;
            rows += 1;
        }
    }

    out.flush().map_err(csv_error)?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::MoneyMatePaths;
    use crate::models::{Budget, BudgetCategory, BudgetMonth, Category, Money, User};
    use crate::services::{ExpenseService, NewExpense};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = MoneyMatePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn seed(storage: &Storage) -> User {
        let user = User::new("Alice", "alice@example.com", "hash", 0.8);
        let month = BudgetMonth::new(2025, 10).unwrap();
        let budget = Budget::new(user.id, Money::from_cents(100_000), month);
        let category = Category::new("Food");
        let link = BudgetCategory::new(budget.id, category.id, 20.0, budget.total_amount);

        storage.users.upsert(user.clone()).unwrap();
        storage.budgets.upsert(budget.clone()).unwrap();
        storage.categories.upsert(category.clone()).unwrap();
        storage.budget_categories.upsert(link).unwrap();

        ExpenseService::new(storage)
            .add(NewExpense {
                budget_id: budget.id,
                category_id: category.id,
                amount: Money::from_cents(1_250),
                description: "Bread, milk".into(),
                date: NaiveDate::from_ymd_opt(2025, 10, 2),
            })
            .unwrap();

        user
    }

    #[test]
    fn test_export_expenses() {
        let (_temp_dir, storage) = create_test_storage();
        let user = seed(&storage);

        let mut buffer = Vec::new();
        let rows = export_user_expenses_csv(&storage, user.id, &mut buffer).unwrap();
        assert_eq!(rows, 1);

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("ID,Date,Budget,Category,Description,Amount"));
        let row = lines.next().unwrap();
        assert!(row.contains("2025-10-02,2025-10,Food,\"Bread, milk\",12.50"));
    }

    #[test]
    fn test_export_allocations() {
        let (_temp_dir, storage) = create_test_storage();
        let user = seed(&storage);

        let mut buffer = Vec::new();
        let rows = export_allocations_csv(&storage, user.id, &mut buffer).unwrap();
        assert_eq!(rows, 1);

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("2025-10,Food,20.00,200.00,12.50,187.50"));
    }
}
