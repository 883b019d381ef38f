//! Budget repository for JSON storage
//!
//! Manages loading and saving monthly budgets to budgets.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::MoneyMateError;
use crate::models::{Budget, BudgetId, BudgetMonth, UserId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    budgets: Vec<Budget>,
}

/// Repository for budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    data: RwLock<HashMap<BudgetId, Budget>>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load budgets from disk
    pub fn load(&self) -> Result<(), MoneyMateError> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for budget in file_data.budgets {
            data.insert(budget.id, budget);
        }

        Ok(())
    }

    /// Save budgets to disk
    pub fn save(&self) -> Result<(), MoneyMateError> {
        let file_data = BudgetData {
            budgets: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: BudgetId) -> Result<Option<Budget>, MoneyMateError> {
        let data = self.data.read().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// All budgets, most recent month first
    pub fn get_all(&self) -> Result<Vec<Budget>, MoneyMateError> {
        let data = self.data.read().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut budgets: Vec<_> = data.values().cloned().collect();
        budgets.sort_by(|a, b| {
            b.month
                .cmp(&a.month)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(budgets)
    }

    /// Budgets owned by a user, most recent month first
    pub fn get_by_user(&self, user_id: UserId) -> Result<Vec<Budget>, MoneyMateError> {
        let mut budgets = self.get_all()?;
        budgets.retain(|b| b.user_id == user_id);
        Ok(budgets)
    }

    /// The user's budget for a month, if any
    pub fn get_for_month(
        &self,
        user_id: UserId,
        month: BudgetMonth,
    ) -> Result<Option<Budget>, MoneyMateError> {
        let data = self.data.read().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data
            .values()
            .find(|b| b.user_id == user_id && b.month == month)
            .cloned())
    }

    pub fn upsert(&self, budget: Budget) -> Result<(), MoneyMateError> {
        let mut data = self.data.write().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(budget.id, budget);
        Ok(())
    }

    pub fn delete(&self, id: BudgetId) -> Result<bool, MoneyMateError> {
        let mut data = self.data.write().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id).is_some())
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
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, BudgetRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        (temp_dir, repo)
    }

    fn month(m: u32) -> BudgetMonth {
        BudgetMonth::new(2025, m).unwrap()
    }

    #[test]
    fn test_get_for_month() {
        let (_temp_dir, repo) = create_test_repo();
        let user = UserId::new();
        let other = UserId::new();

        repo.upsert(Budget::new(user, Money::from_cents(100_000), month(9)))
            .unwrap();
        repo.upsert(Budget::new(user, Money::from_cents(120_000), month(10)))
            .unwrap();
        repo.upsert(Budget::new(other, Money::from_cents(50_000), month(10)))
            .unwrap();

        let found = repo.get_for_month(user, month(10)).unwrap().unwrap();
        assert_eq!(found.total_amount.cents(), 120_000);
        assert!(repo.get_for_month(user, month(11)).unwrap().is_none());
    }

    #[test]
    fn test_get_by_user_newest_first() {
        let (_temp_dir, repo) = create_test_repo();
        let user = UserId::new();
        for m in [3, 11, 7] {
            repo.upsert(Budget::new(user, Money::from_cents(1_000), month(m)))
                .unwrap();
        }
        repo.upsert(Budget::new(UserId::new(), Money::zero(), month(12)))
            .unwrap();

        let months: Vec<_> = repo
            .get_by_user(user)
            .unwrap()
            .iter()
            .map(|b| b.month.month)
            .collect();
        assert_eq!(months, vec![11, 7, 3]);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let budget = Budget::new(UserId::new(), Money::from_cents(200_000), month(10));
        let id = budget.id;
        repo.upsert(budget).unwrap();
        repo.save().unwrap();

        let reloaded = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        reloaded.load().unwrap();
        let budget = reloaded.get(id).unwrap().unwrap();
        assert_eq!(budget.month, month(10));
        assert_eq!(budget.total_amount.cents(), 200_000);
    }
}
