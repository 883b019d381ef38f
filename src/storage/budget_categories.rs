//! Allocation repository for JSON storage
//!
//! Manages loading and saving budget/category links to
//! budget_categories.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::MoneyMateError;
use crate::models::{BudgetCategory, BudgetCategoryId, BudgetId, CategoryId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetCategoryData {
    budget_categories: Vec<BudgetCategory>,
}

/// Repository for budget/category link persistence
pub struct BudgetCategoryRepository {
    path: PathBuf,
    data: RwLock<HashMap<BudgetCategoryId, BudgetCategory>>,
}

impl BudgetCategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load links from disk
    pub fn load(&self) -> Result<(), MoneyMateError> {
        let file_data: BudgetCategoryData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for link in file_data.budget_categories {
            data.insert(link.id, link);
        }

        Ok(())
    }

    /// Save links to disk
    pub fn save(&self) -> Result<(), MoneyMateError> {
        let file_data = BudgetCategoryData {
            budget_categories: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: BudgetCategoryId) -> Result<Option<BudgetCategory>, MoneyMateError> {
        let data = self.data.read().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// All links in creation order
    pub fn get_all(&self) -> Result<Vec<BudgetCategory>, MoneyMateError> {
        let data = self.data.read().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut links: Vec<_> = data.values().cloned().collect();
        links.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(links)
    }

    /// The link between a budget and a category, if present
    pub fn get_link(
        &self,
        budget_id: BudgetId,
        category_id: CategoryId,
    ) -> Result<Option<BudgetCategory>, MoneyMateError> {
        let data = self.data.read().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data
            .values()
            .find(|l| l.budget_id == budget_id && l.category_id == category_id)
            .cloned())
    }

    pub fn get_by_budget(&self, budget_id: BudgetId) -> Result<Vec<BudgetCategory>, MoneyMateError> {
        let mut links = self.get_all()?;
        links.retain(|l| l.budget_id == budget_id);
        Ok(links)
    }

    pub fn get_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<BudgetCategory>, MoneyMateError> {
        let mut links = self.get_all()?;
        links.retain(|l| l.category_id == category_id);
        Ok(links)
    }

    pub fn upsert(&self, link: BudgetCategory) -> Result<(), MoneyMateError> {
        let mut data = self.data.write().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(link.id, link);
        Ok(())
    }

    pub fn delete(&self, id: BudgetCategoryId) -> Result<bool, MoneyMateError> {
        let mut data = self.data.write().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id).is_some())
    }

    /// Remove every link matching `pred`, returning the removed rows
    pub fn delete_where<F>(&self, pred: F) -> Result<Vec<BudgetCategory>, MoneyMateError>
    where
        F: Fn(&BudgetCategory) -> bool,
    {
        let mut data = self.data.write().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let ids: Vec<_> = data.values().filter(|l| pred(l)).map(|l| l.id).collect();
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
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, BudgetCategoryRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = BudgetCategoryRepository::new(temp_dir.path().join("budget_categories.json"));
        (temp_dir, repo)
    }

    fn link(budget_id: BudgetId, category_id: CategoryId) -> BudgetCategory {
        BudgetCategory::new(budget_id, category_id, 10.0, Money::from_cents(100_000))
    }

    #[test]
    fn test_get_link() {
        let (_temp_dir, repo) = create_test_repo();
        let budget = BudgetId::new();
        let category = CategoryId::new();
        repo.upsert(link(budget, category)).unwrap();

        assert!(repo.get_link(budget, category).unwrap().is_some());
        assert!(repo.get_link(budget, CategoryId::new()).unwrap().is_none());
    }

    #[test]
    fn test_by_budget_and_category() {
        let (_temp_dir, repo) = create_test_repo();
        let budget = BudgetId::new();
        let food = CategoryId::new();
        let rent = CategoryId::new();

        repo.upsert(link(budget, food)).unwrap();
        repo.upsert(link(budget, rent)).unwrap();
        repo.upsert(link(BudgetId::new(), food)).unwrap();

        assert_eq!(repo.get_by_budget(budget).unwrap().len(), 2);
        assert_eq!(repo.get_by_category(food).unwrap().len(), 2);
        assert_eq!(repo.get_by_category(rent).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_where() {
        let (_temp_dir, repo) = create_test_repo();
        let budget = BudgetId::new();
        repo.upsert(link(budget, CategoryId::new())).unwrap();
        repo.upsert(link(budget, CategoryId::new())).unwrap();
        repo.upsert(link(BudgetId::new(), CategoryId::new())).unwrap();

        let removed = repo.delete_where(|l| l.budget_id == budget).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let row = link(BudgetId::new(), CategoryId::new());
        let id = row.id;
        repo.upsert(row).unwrap();
        repo.save().unwrap();

        let reloaded =
            BudgetCategoryRepository::new(temp_dir.path().join("budget_categories.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.get(id).unwrap().unwrap().limit_amount.cents(), 10_000);
    }
}
