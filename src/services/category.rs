//! Category service
//!
//! Provides business logic for the global category list: CRUD with name
//! and colour validation, and the cascade that removes a deleted category
//! from every budget.

use crate::audit::EntityType;
use crate::error::{MoneyMateError, MoneyMateResult};
use crate::models::category::{is_valid_color, normalize_color};
use crate::models::{BudgetCategory, BudgetId, Category, CategoryId};
use crate::storage::Storage;

use super::budget_category::BudgetCategoryService;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new category
    pub fn create(&self, name: &str, color: Option<&str>) -> MoneyMateResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MoneyMateError::Validation(
                "Category name cannot be empty".into(),
            ));
        }

        if self.storage.categories.get_by_name(name)?.is_some() {
            return Err(MoneyMateError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            });
        }

        let category = match color {
            Some(c) => Category::with_color(name, c),
            None => Category::new(name),
        };

        category
            .validate()
            .map_err(|e| MoneyMateError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(category)
    }

    /// Create a category and link it to a budget in one step
    ///
    /// The percentage is checked before anything is written.
    pub fn create_in_budget(
        &self,
        name: &str,
        color: Option<&str>,
        budget_id: BudgetId,
        percentage: f64,
    ) -> MoneyMateResult<(Category, BudgetCategory)> {
        if !(percentage > 0.0 && percentage <= 100.0) {
            return Err(MoneyMateError::Validation(format!(
                "Percentage must be greater than 0 and at most 100, got {}",
                percentage
            )));
        }

        if self.storage.budgets.get(budget_id)?.is_none() {
            return Err(MoneyMateError::budget_not_found(budget_id.to_string()));
        }

        let category = self.create(name, color)?;
        let link = BudgetCategoryService::new(self.storage).add(
            budget_id,
            category.id,
            Some(percentage),
        )?;

        Ok((category, link))
    }

    pub fn get(&self, id: CategoryId) -> MoneyMateResult<Option<Category>> {
        self.storage.categories.get(id)
    }

    /// Find a category by name or ID string
    pub fn find(&self, identifier: &str) -> MoneyMateResult<Option<Category>> {
        if let Some(category) = self.storage.categories.get_by_name(identifier)? {
            return Ok(Some(category));
        }

        Ok(self
            .storage
            .categories
            .get_all()?
            .into_iter()
            .find(|c| c.id.matches(identifier)))
    }

    /// All categories sorted by name
    pub fn list(&self) -> MoneyMateResult<Vec<Category>> {
        self.storage.categories.get_all()
    }

    /// Rename and/or recolour a category
    pub fn update(
        &self,
        id: CategoryId,
        name: Option<&str>,
        color: Option<&str>,
    ) -> MoneyMateResult<Category> {
        let mut category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| MoneyMateError::category_not_found(id.to_string()))?;

        let before = category.clone();

        if let Some(new_name) = name {
            let new_name = new_name.trim();
            if new_name.is_empty() {
                return Err(MoneyMateError::Validation(
                    "Category name cannot be empty".into(),
                ));
            }

            if let Some(existing) = self.storage.categories.get_by_name(new_name)? {
                if existing.id != id {
                    return Err(MoneyMateError::Duplicate {
                        entity_type: "Category",
                        identifier: new_name.to_string(),
                    });
                }
            }

            category.name = new_name.to_string();
        }

        if let Some(new_color) = color {
            let normalized = normalize_color(new_color);
            if !is_valid_color(&normalized) {
                return Err(MoneyMateError::Validation(format!(
                    "Invalid colour '{}' (expected #RRGGBB)",
                    new_color
                )));
            }
            category.color_hex = normalized;
        }

        category
            .validate()
            .map_err(|e| MoneyMateError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_update(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &before,
            &category,
            None,
        )?;

        Ok(category)
    }

    /// Delete a category and every budget link that uses it
    ///
    /// Returns the number of links removed. Expenses keep their category id.
    pub fn delete(&self, id: CategoryId) -> MoneyMateResult<usize> {
        let category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| MoneyMateError::category_not_found(id.to_string()))?;

        let removed_links = BudgetCategoryService::new(self.storage).delete_links_for_category(id)?;

        self.storage.categories.delete(id)?;
        self.storage.categories.save()?;

        self.storage.log_delete(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(removed_links)
    }
}
