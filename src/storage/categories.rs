//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::MoneyMateError;
use crate::models::{Category, CategoryId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable category data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CategoryData {
    pub categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    data: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> Result<(), MoneyMateError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for category in file_data.categories {
            data.insert(category.id, category);
        }

        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> Result<(), MoneyMateError> {
        let file_data = CategoryData {
            categories: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, MoneyMateError> {
        let data = self.data.read().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// All categories sorted by name
    pub fn get_all(&self) -> Result<Vec<Category>, MoneyMateError> {
        let data = self.data.read().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut categories: Vec<_> = data.values().cloned().collect();
        categories.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(categories)
    }

    /// Find a category by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Category>, MoneyMateError> {
        let data = self.data.read().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let name = name.trim().to_lowercase();
        Ok(data
            .values()
            .find(|c| c.name.to_lowercase() == name)
            .cloned())
    }

    pub fn upsert(&self, category: Category) -> Result<(), MoneyMateError> {
        let mut data = self.data.write().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(category.id, category);
        Ok(())
    }

    pub fn delete(&self, id: CategoryId) -> Result<bool, MoneyMateError> {
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
