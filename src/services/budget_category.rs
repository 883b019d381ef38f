//! Allocation service
//!
//! Manages the links that give a category a percentage of one budget, and
//! keeps each link's limit in step with the budget total.

use crate::audit::EntityType;
use crate::error::{MoneyMateError, MoneyMateResult};
use crate::models::{
    Budget, BudgetCategory, BudgetCategoryId, BudgetId, Category, CategoryId, Money,
};
use crate::storage::Storage;

/// Service for budget/category allocations
pub struct BudgetCategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetCategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Link a category to a budget
    ///
    /// Uses the configured default percentage when none is given. The limit
    /// is computed from the current budget total.
    pub fn add(
        &self,
        budget_id: BudgetId,
        category_id: CategoryId,
        percentage: Option<f64>,
    ) -> MoneyMateResult<BudgetCategory> {
        let percentage =
            percentage.unwrap_or(self.storage.settings().default_allocation_percentage);
        validate_percentage(percentage)?;

        let budget = self.require_budget(budget_id)?;
        let category = self
            .storage
            .categories
            .get(category_id)?
            .ok_or_else(|| MoneyMateError::category_not_found(category_id.to_string()))?;

        if self.storage.budget_categories.get_link(budget_id, category_id)?.is_some() {
            return Err(MoneyMateError::Duplicate {
                entity_type: "Allocation",
                identifier: format!("{} in {}", category.name, budget.month),
            });
        }

        let link = BudgetCategory::new(budget_id, category_id, percentage, budget.total_amount);

        self.storage.budget_categories.upsert(link.clone())?;
        self.storage.budget_categories.save()?;

        self.storage.log_create(
            EntityType::BudgetCategory,
            link.id.to_string(),
            Some(format!("{} / {}", budget.month, category.name)),
            &link,
        )?;

        Ok(link)
    }

    /// Change a link's percentage and recompute its limit
    pub fn update_percentage(
        &self,
        id: BudgetCategoryId,
        percentage: f64,
    ) -> MoneyMateResult<BudgetCategory> {
        validate_percentage(percentage)?;

        let mut link = self.require(id)?;
        let budget = self.require_budget(link.budget_id)?;
        let before = link.clone();

        link.set_percentage(percentage, budget.total_amount);

        self.storage.budget_categories.upsert(link.clone())?;
        self.storage.budget_categories.save()?;

        self.storage.log_update(
            EntityType::BudgetCategory,
            link.id.to_string(),
            None,
            &before,
            &link,
            None,
        )?;

        Ok(link)
    }

    /// Remove a link; expenses already charged to it are kept
    pub fn remove(&self, id: BudgetCategoryId) -> MoneyMateResult<BudgetCategory> {
        let link = self.require(id)?;

        self.storage.budget_categories.delete(id)?;
        self.storage.budget_categories.save()?;

        self.storage
            .log_delete(EntityType::BudgetCategory, link.id.to_string(), None, &link)?;

        Ok(link)
    }

    /// Remove the link between a budget and a category
    pub fn remove_link(
        &self,
        budget_id: BudgetId,
        category_id: CategoryId,
    ) -> MoneyMateResult<BudgetCategory> {
        let link = self
            .storage
            .budget_categories
            .get_link(budget_id, category_id)?
            .ok_or_else(|| {
                MoneyMateError::allocation_not_found(format!("{} in {}", category_id, budget_id))
            })?;
        self.remove(link.id)
    }

    pub fn get(&self, id: BudgetCategoryId) -> MoneyMateResult<Option<BudgetCategory>> {
        self.storage.budget_categories.get(id)
    }

    pub fn get_link(
        &self,
        budget_id: BudgetId,
        category_id: CategoryId,
    ) -> MoneyMateResult<Option<BudgetCategory>> {
        self.storage.budget_categories.get_link(budget_id, category_id)
    }

    pub fn list_for_budget(&self, budget_id: BudgetId) -> MoneyMateResult<Vec<BudgetCategory>> {
        self.storage.budget_categories.get_by_budget(budget_id)
    }

    /// Categories linked to a budget, sorted by name
    pub fn categories_for_budget(&self, budget_id: BudgetId) -> MoneyMateResult<Vec<Category>> {
        let mut categories = Vec::new();
        for link in self.storage.budget_categories.get_by_budget(budget_id)? {
            if let Some(category) = self.storage.categories.get(link.category_id)? {
                categories.push(category);
            }
        }
        categories.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(categories)
    }

    /// Budgets a category is linked to, most recent month first
    pub fn budgets_for_category(&self, category_id: CategoryId) -> MoneyMateResult<Vec<Budget>> {
        let mut budgets = Vec::new();
        for link in self.storage.budget_categories.get_by_category(category_id)? {
            if let Some(budget) = self.storage.budgets.get(link.budget_id)? {
                budgets.push(budget);
            }
        }
        budgets.sort_by(|a, b| b.month.cmp(&a.month));
        Ok(budgets)
    }

    /// Remove every link of a category, returning how many were removed
    pub fn delete_links_for_category(&self, category_id: CategoryId) -> MoneyMateResult<usize> {
        let removed = self
            .storage
            .budget_categories
            .delete_where(|l| l.category_id == category_id)?;
        self.finish_bulk_delete(&removed)
    }

    /// Remove every link of a budget, returning how many were removed
    pub fn delete_links_for_budget(&self, budget_id: BudgetId) -> MoneyMateResult<usize> {
        let removed = self
            .storage
            .budget_categories
            .delete_where(|l| l.budget_id == budget_id)?;
        self.finish_bulk_delete(&removed)
    }

    /// Recompute every link limit of a budget from its current total
    pub fn recalculate_limits_for_budget(
        &self,
        budget_id: BudgetId,
    ) -> MoneyMateResult<Vec<BudgetCategory>> {
        let budget = self.require_budget(budget_id)?;
        let mut links = self.storage.budget_categories.get_by_budget(budget_id)?;

        for link in &mut links {
            link.recalculate_limit(budget.total_amount);
            self.storage.budget_categories.upsert(link.clone())?;
        }

        if !links.is_empty() {
            self.storage.budget_categories.save()?;
        }

        Ok(links)
    }

    /// Adjust a link's spent amount by `delta` (clamped to 0..=limit)
    pub(crate) fn apply_spent(
        &self,
        id: BudgetCategoryId,
        delta: Money,
    ) -> MoneyMateResult<BudgetCategory> {
        let mut link = self.require(id)?;
        if delta.is_negative() {
            link.remove_spent(-delta);
        } else {
            link.add_spent(delta);
        }

        self.storage.budget_categories.upsert(link.clone())?;
        self.storage.budget_categories.save()?;
        Ok(link)
    }

    /// Sum of link percentages for a budget
    pub fn allocated_percentage(&self, budget_id: BudgetId) -> MoneyMateResult<f64> {
        Ok(self
            .storage
            .budget_categories
            .get_by_budget(budget_id)?
            .iter()
            .map(|l| l.percentage)
            .sum())
    }

    fn finish_bulk_delete(&self, removed: &[BudgetCategory]) -> MoneyMateResult<usize> {
        if removed.is_empty() {
            return Ok(0);
        }

        self.storage.budget_categories.save()?;
        for link in removed {
            self.storage
                .log_delete(EntityType::BudgetCategory, link.id.to_string(), None, link)?;
        }

        Ok(removed.len())
    }

    fn require(&self, id: BudgetCategoryId) -> MoneyMateResult<BudgetCategory> {
        self.storage
            .budget_categories
            .get(id)?
            .ok_or_else(|| MoneyMateError::allocation_not_found(id.to_string()))
    }

    fn require_budget(&self, id: BudgetId) -> MoneyMateResult<Budget> {
        self.storage
            .budgets
            .get(id)?
            .ok_or_else(|| MoneyMateError::budget_not_found(id.to_string()))
    }
}

/// Amount a percentage of `total` would allocate, rounded to the cent
pub fn preview_amount(total: Money, percentage: f64) -> Money {
    total.percentage(percentage.clamp(0.0, 100.0))
}

/// Percentage of `total` an amount represents, rounded to two decimals
pub fn percentage_for_amount(total: Money, amount: Money) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    (amount.ratio_of(total) * 100.0 * 100.0).round() / 100.0
}

fn validate_percentage(percentage: f64) -> MoneyMateResult<()> {
    if percentage.is_finite() && percentage > 0.0 && percentage <= 100.0 {
        Ok(())
    } else {
        Err(MoneyMateError::Validation(format!(
            "Percentage must be greater than 0 and at most 100, got {}",
            percentage
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::MoneyMatePaths;
    use crate::models::{BudgetMonth, UserId};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = MoneyMatePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn seed(storage: &Storage, total_cents: i64) -> (Budget, Category) {
        let budget = Budget::new(
            UserId::new(),
            Money::from_cents(total_cents),
            BudgetMonth::new(2025, 10).unwrap(),
        );
        let category = Category::new("Food");
        storage.budgets.upsert(budget.clone()).unwrap();
        storage.categories.upsert(category.clone()).unwrap();
        (budget, category)
    }

    #[test]
    fn test_add_computes_limit() {
        let (_temp_dir, storage) = create_test_storage();
        let (budget, category) = seed(&storage, 200_000);
        let service = BudgetCategoryService::new(&storage);

        let link = service.add(budget.id, category.id, Some(25.0)).unwrap();
        assert_eq!(link.limit_amount.cents(), 50_000);
        assert_eq!(service.list_for_budget(budget.id).unwrap().len(), 1);
    }

    #[test]
    fn test_add_uses_default_percentage() {
        let (_temp_dir, storage) = create_test_storage();
        let (budget, category) = seed(&storage, 200_000);
        let service = BudgetCategoryService::new(&storage);

        let link = service.add(budget.id, category.id, None).unwrap();
        assert_eq!(link.percentage, 10.0);
        assert_eq!(link.limit_amount.cents(), 20_000);
    }

    #[test]
    fn test_add_rejects_duplicates_and_bad_input() {
        let (_temp_dir, storage) = create_test_storage();
        let (budget, category) = seed(&storage, 100_000);
        let service = BudgetCategoryService::new(&storage);

        service.add(budget.id, category.id, Some(10.0)).unwrap();
        assert!(service.add(budget.id, category.id, Some(20.0)).unwrap_err().is_duplicate());
        assert!(service.add(budget.id, CategoryId::new(), Some(20.0)).unwrap_err().is_not_found());
        assert!(service.add(BudgetId::new(), category.id, Some(20.0)).unwrap_err().is_not_found());
        assert!(service.add(budget.id, category.id, Some(0.0)).unwrap_err().is_validation());
        assert!(service.add(budget.id, category.id, Some(100.5)).unwrap_err().is_validation());
    }

    #[test]
    fn test_update_percentage() {
        let (_temp_dir, storage) = create_test_storage();
        let (budget, category) = seed(&storage, 100_000);
        let service = BudgetCategoryService::new(&storage);
        let link = service.add(budget.id, category.id, Some(10.0)).unwrap();

        let updated = service.update_percentage(link.id, 40.0).unwrap();
        assert_eq!(updated.limit_amount.cents(), 40_000);
    }

    #[test]
    fn test_recalculate_limits() {
        let (_temp_dir, storage) = create_test_storage();
        let (mut budget, category) = seed(&storage, 100_000);
        let service = BudgetCategoryService::new(&storage);
        service.add(budget.id, category.id, Some(30.0)).unwrap();

        budget.set_total(Money::from_cents(50_000));
        storage.budgets.upsert(budget.clone()).unwrap();

        let links = service.recalculate_limits_for_budget(budget.id).unwrap();
        assert_eq!(links[0].limit_amount.cents(), 15_000);
    }

    #[test]
    fn test_lookups_and_removal() {
        let (_temp_dir, storage) = create_test_storage();
        let (budget, food) = seed(&storage, 100_000);
        let rent = Category::new("Rent");
        storage.categories.upsert(rent.clone()).unwrap();
        let service = BudgetCategoryService::new(&storage);

        service.add(budget.id, rent.id, Some(50.0)).unwrap();
        service.add(budget.id, food.id, Some(20.0)).unwrap();

        let names: Vec<_> = service
            .categories_for_budget(budget.id)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Food", "Rent"]);
        assert_eq!(service.budgets_for_category(food.id).unwrap().len(), 1);
        assert_eq!(service.allocated_percentage(budget.id).unwrap(), 70.0);

        service.remove_link(budget.id, food.id).unwrap();
        assert!(service.get_link(budget.id, food.id).unwrap().is_none());
        assert!(service.remove_link(budget.id, food.id).unwrap_err().is_not_found());

        assert_eq!(service.delete_links_for_budget(budget.id).unwrap(), 1);
        assert_eq!(storage.budget_categories.count().unwrap(), 0);
    }

    #[test]
    fn test_apply_spent_clamps() {
        let (_temp_dir, storage) = create_test_storage();
        let (budget, category) = seed(&storage, 100_000);
        let service = BudgetCategoryService::new(&storage);
        let link = service.add(budget.id, category.id, Some(10.0)).unwrap();

        let link_after = service.apply_spent(link.id, Money::from_cents(15_000)).unwrap();
        assert_eq!(link_after.spent_amount.cents(), 10_000);

        let link_after = service.apply_spent(link.id, Money::from_cents(-20_000)).unwrap();
        assert_eq!(link_after.spent_amount, Money::zero());
    }

    #[test]
    fn test_preview_helpers() {
        assert_eq!(preview_amount(Money::from_cents(123_456), 10.0).cents(), 12_346);
        assert_eq!(preview_amount(Money::from_cents(10_000), 150.0).cents(), 10_000);
        assert_eq!(
            percentage_for_amount(Money::from_cents(300_000), Money::from_cents(100_000)),
            33.33
        );
        assert_eq!(percentage_for_amount(Money::zero(), Money::from_cents(5)), 0.0);
    }
}
