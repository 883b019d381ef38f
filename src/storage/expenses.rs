//! Expense repository for JSON storage
//!
//! Manages loading and saving expenses to expenses.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::MoneyMateError;
use crate::models::{BudgetCategoryId, BudgetId, Expense, ExpenseId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

/// Repository for expense persistence
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load expenses from disk
    pub fn load(&self) -> Result<(), MoneyMateError> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for expense in file_data.expenses {
            data.insert(expense.id, expense);
        }

        Ok(())
    }

    /// Save expenses to disk
    pub fn save(&self) -> Result<(), MoneyMateError> {
        let file_data = ExpenseData {
            expenses: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: ExpenseId) -> Result<Option<Expense>, MoneyMateError> {
        let data = self.data.read().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// All expenses, newest first
    pub fn get_all(&self) -> Result<Vec<Expense>, MoneyMateError> {
        let data = self.data.read().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(expenses)
    }

    /// Expenses of one budget, newest first
    pub fn get_by_budget(&self, budget_id: BudgetId) -> Result<Vec<Expense>, MoneyMateError> {
        let mut expenses = self.get_all()?;
        expenses.retain(|e| e.budget_id == budget_id);
        Ok(expenses)
    }

    /// Expenses charged to one allocation, newest first
    pub fn get_by_allocation(
        &self,
        allocation_id: BudgetCategoryId,
    ) -> Result<Vec<Expense>, MoneyMateError> {
        let mut expenses = self.get_all()?;
        expenses.retain(|e| e.budget_category_id == allocation_id);
        Ok(expenses)
    }

    pub fn upsert(&self, expense: Expense) -> Result<(), MoneyMateError> {
        let mut data = self.data.write().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(expense.id, expense);
        Ok(())
    }

    pub fn delete(&self, id: ExpenseId) -> Result<bool, MoneyMateError> {
        let mut data = self.data.write().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id).is_some())
    }

    /// Remove every expense of a budget, returning the removed rows
    pub fn delete_by_budget(&self, budget_id: BudgetId) -> Result<Vec<Expense>, MoneyMateError> {
        let mut data = self.data.write().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let ids: Vec<_> = data
            .values()
            .filter(|e| e.budget_id == budget_id)
            .map(|e| e.id)
            .collect();
        Ok(ids.into_iter().filter_map(|id| data.remove(&id)).collect())
    }

    pub fn count(&self) -> Result<usize, MoneyMateError> {
        let data = self.data.read().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryId, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ExpenseRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        (temp_dir, repo)
    }

    fn expense(budget_id: BudgetId, day: u32, cents: i64) -> Expense {
        Expense::new(
            budget_id,
            BudgetCategoryId::new(),
            CategoryId::new(),
            Money::from_cents(cents),
            "",
            NaiveDate::from_ymd_opt(2025, 10, day).unwrap(),
        )
    }

    #[test]
    fn test_newest_first() {
        let (_temp_dir, repo) = create_test_repo();
        let budget = BudgetId::new();
        for day in [3, 21, 9] {
            repo.upsert(expense(budget, day, 100)).unwrap();
        }

        let days: Vec<_> = repo
            .get_by_budget(budget)
            .unwrap()
            .iter()
            .map(|e| e.date.format("%d").to_string())
            .collect();
        assert_eq!(days, vec!["21", "09", "03"]);
    }

    #[test]
    fn test_get_by_allocation() {
        let (_temp_dir, repo) = create_test_repo();
        let first = expense(BudgetId::new(), 1, 500);
        let allocation = first.budget_category_id;
        repo.upsert(first).unwrap();
        repo.upsert(expense(BudgetId::new(), 2, 700)).unwrap();

        let found = repo.get_by_allocation(allocation).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].amount.cents(), 500);
    }

    #[test]
    fn test_delete_by_budget() {
        let (_temp_dir, repo) = create_test_repo();
        let budget = BudgetId::new();
        repo.upsert(expense(budget, 1, 100)).unwrap();
        repo.upsert(expense(budget, 2, 100)).unwrap();
        repo.upsert(expense(BudgetId::new(), 3, 100)).unwrap();

        assert_eq!(repo.delete_by_budget(budget).unwrap().len(), 2);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let row = expense(BudgetId::new(), 12, 4_599);
        let id = row.id;
        repo.upsert(row).unwrap();
        repo.save().unwrap();

        let reloaded = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.get(id).unwrap().unwrap().amount.cents(), 4_599);
    }
}
