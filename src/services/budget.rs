//! Budget service
//!
//! Provides business logic for monthly budgets: one budget per user per
//! month, total changes that flow through to allocation limits, and the
//! budget overview.

use crate::audit::EntityType;
use crate::error::{MoneyMateError, MoneyMateResult};
use crate::models::{
    Budget, BudgetCategory, BudgetId, BudgetMonth, Category, CategoryId, Money, UserId,
};
use crate::storage::Storage;

use super::alert::AlertService;
use super::budget_category::BudgetCategoryService;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

/// Spending of one allocation within a budget
#[derive(Debug, Clone)]
pub struct CategoryBudgetSummary {
    pub link: BudgetCategory,
    pub name: String,
    pub color_hex: String,
}

impl CategoryBudgetSummary {
    pub fn remaining(&self) -> Money {
        self.link.remaining_amount()
    }

    /// Fraction of the limit spent (0.0 for a zero limit)
    pub fn progress(&self) -> f64 {
        self.link.usage_ratio().unwrap_or(0.0)
    }
}

/// Budget overview for a month
#[derive(Debug, Clone)]
pub struct BudgetOverview {
    pub budget: Budget,
    pub total: Money,
    /// Sum of recorded expenses (not clamped)
    pub spent: Money,
    pub remaining: Money,
    /// Spent over total, 0.0 when the total is zero
    pub progress: f64,
    pub allocated_percentage: f64,
    pub unallocated_percentage: f64,
    pub categories: Vec<CategoryBudgetSummary>,
}

impl BudgetOverview {
    pub fn is_over_allocated(&self) -> bool {
        self.allocated_percentage > 100.0
    }
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a budget for a user and month
    pub fn create(&self, user_id: UserId, total: Money, month: BudgetMonth) -> MoneyMateResult<Budget> {
        if self.storage.users.get(user_id)?.is_none() {
            return Err(MoneyMateError::user_not_found(user_id.to_string()));
        }

        if self.storage.budgets.get_for_month(user_id, month)?.is_some() {
            return Err(MoneyMateError::Duplicate {
                entity_type: "Budget",
                identifier: month.to_string(),
            });
        }

        let budget = Budget::new(user_id, total, month);
        budget
            .validate()
            .map_err(|e| MoneyMateError::Validation(e.to_string()))?;

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_create(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.month.friendly()),
            &budget,
        )?;

        Ok(budget)
    }

    pub fn get(&self, id: BudgetId) -> MoneyMateResult<Option<Budget>> {
        self.storage.budgets.get(id)
    }

    /// Find one of a user's budgets by month ("2025-10", "current") or ID
    pub fn find_for_user(&self, user_id: UserId, identifier: &str) -> MoneyMateResult<Option<Budget>> {
        if let Ok(month) = BudgetMonth::parse(identifier) {
            return self.storage.budgets.get_for_month(user_id, month);
        }

        Ok(self
            .storage
            .budgets
            .get_by_user(user_id)?
            .into_iter()
            .find(|b| b.id.matches(identifier)))
    }

    /// A user's budgets, most recent month first
    pub fn list_for_user(&self, user_id: UserId) -> MoneyMateResult<Vec<Budget>> {
        self.storage.budgets.get_by_user(user_id)
    }

    pub fn list_all(&self) -> MoneyMateResult<Vec<Budget>> {
        self.storage.budgets.get_all()
    }

    /// The user's budget for a month (the current month by default)
    pub fn current_for_user(
        &self,
        user_id: UserId,
        month: Option<BudgetMonth>,
    ) -> MoneyMateResult<Option<Budget>> {
        let month = month.unwrap_or_else(BudgetMonth::current);
        self.storage.budgets.get_for_month(user_id, month)
    }

    /// Change the total, re-clamp spent and recompute every allocation limit
    pub fn update_total(&self, id: BudgetId, total: Money) -> MoneyMateResult<Budget> {
        let mut budget = self.require(id)?;
        let before = budget.clone();

        budget.set_total(total);
        budget
            .validate()
            .map_err(|e| MoneyMateError::Validation(e.to_string()))?;

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_update(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.month.friendly()),
            &before,
            &budget,
            Some(format!("total: {} -> {}", before.total_amount, budget.total_amount)),
        )?;

        BudgetCategoryService::new(self.storage).recalculate_limits_for_budget(id)?;

        Ok(budget)
    }

    pub fn set_active(&self, id: BudgetId, active: bool) -> MoneyMateResult<Budget> {
        let mut budget = self.require(id)?;
        if budget.is_active == active {
            return Ok(budget);
        }

        let before = budget.clone();
        budget.is_active = active;

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        self.storage.log_update(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.month.friendly()),
            &before,
            &budget,
            None,
        )?;

        Ok(budget)
    }

    /// Reuse a budget for another month with a new total
    ///
    /// Spent amounts are zeroed and allocation limits recomputed; recorded
    /// expenses stay attached to the budget.
    pub fn reset_for_new_month(
        &self,
        id: BudgetId,
        total: Money,
        month: BudgetMonth,
    ) -> MoneyMateResult<Budget> {
        let mut budget = self.require(id)?;

        if let Some(existing) = self.storage.budgets.get_for_month(budget.user_id, month)? {
            if existing.id != id {
                return Err(MoneyMateError::Duplicate {
                    entity_type: "Budget",
                    identifier: month.to_string(),
                });
            }
        }

        let before = budget.clone();
        budget.reset_for_month(total, month);
        budget
            .validate()
            .map_err(|e| MoneyMateError::Validation(e.to_string()))?;

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        for mut link in self.storage.budget_categories.get_by_budget(id)? {
            link.spent_amount = Money::zero();
            self.storage.budget_categories.upsert(link)?;
        }
        BudgetCategoryService::new(self.storage).recalculate_limits_for_budget(id)?;

        self.storage.log_update(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.month.friendly()),
            &before,
            &budget,
            Some(format!("reset: {} -> {}", before.month, budget.month)),
        )?;

        Ok(budget)
    }

    /// Delete a budget with its allocations and expenses
    pub fn delete(&self, id: BudgetId) -> MoneyMateResult<Budget> {
        let budget = self.require(id)?;

        BudgetCategoryService::new(self.storage).delete_links_for_budget(id)?;

        let expenses = self.storage.expenses.delete_by_budget(id)?;
        if !expenses.is_empty() {
            self.storage.expenses.save()?;
            for expense in &expenses {
                self.storage
                    .log_delete(EntityType::Expense, expense.id.to_string(), None, expense)?;
            }
        }

        AlertService::new(self.storage).delete_all_for_budget(id)?;

        self.storage.budgets.delete(id)?;
        self.storage.budgets.save()?;

        self.storage.log_delete(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.month.friendly()),
            &budget,
        )?;

        Ok(budget)
    }

    /// Totals, progress and per-category breakdown of a budget
    pub fn overview(&self, id: BudgetId) -> MoneyMateResult<BudgetOverview> {
        let budget = self.require(id)?;

        let spent: Money = self
            .storage
            .expenses
            .get_by_budget(id)?
            .iter()
            .map(|e| e.amount)
            .sum();

        let mut categories = Vec::new();
        for link in self.storage.budget_categories.get_by_budget(id)? {
            let (name, color_hex) = match self.storage.categories.get(link.category_id)? {
                Some(c) => (c.name, c.color_hex),
                None => continue,
            };
            categories.push(CategoryBudgetSummary {
                link,
                name,
                color_hex,
            });
        }
        categories.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        let allocated_percentage: f64 = categories.iter().map(|c| c.link.percentage).sum();

        Ok(BudgetOverview {
            total: budget.total_amount,
            spent,
            remaining: budget.total_amount - spent,
            progress: spent.ratio_of(budget.total_amount),
            allocated_percentage,
            unallocated_percentage: (100.0 - allocated_percentage).max(0.0),
            categories,
            budget,
        })
    }

    pub fn add_category_to_budget(
        &self,
        budget_id: BudgetId,
        category_id: CategoryId,
        percentage: Option<f64>,
    ) -> MoneyMateResult<BudgetCategory> {
        BudgetCategoryService::new(self.storage).add(budget_id, category_id, percentage)
    }

    pub fn remove_category_from_budget(
        &self,
        budget_id: BudgetId,
        category_id: CategoryId,
    ) -> MoneyMateResult<BudgetCategory> {
        BudgetCategoryService::new(self.storage).remove_link(budget_id, category_id)
    }

    pub fn categories_for_budget(&self, budget_id: BudgetId) -> MoneyMateResult<Vec<Category>> {
        BudgetCategoryService::new(self.storage).categories_for_budget(budget_id)
    }

    pub fn budgets_for_category(&self, category_id: CategoryId) -> MoneyMateResult<Vec<Budget>> {
        BudgetCategoryService::new(self.storage).budgets_for_category(category_id)
    }

    fn require(&self, id: BudgetId) -> MoneyMateResult<Budget> {
        self.storage
            .budgets
            .get(id)?
            .ok_or_else(|| MoneyMateError::budget_not_found(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::MoneyMatePaths;
    use crate::models::{Alert, User};
    use crate::services::expense::{ExpenseService, NewExpense};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = MoneyMatePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn seed_user(storage: &Storage) -> User {
        let user = User::new("Alice", "alice@example.com", "hash", 0.8);
        storage.users.upsert(user.clone()).unwrap();
        user
    }

    fn october() -> BudgetMonth {
        BudgetMonth::new(2025, 10).unwrap()
    }

    fn seed_category(storage: &Storage, name: &str) -> Category {
        let category = Category::new(name);
        storage.categories.upsert(category.clone()).unwrap();
        category
    }

    #[test]
    fn test_create_budget() {
        let (_temp_dir, storage) = create_test_storage();
        let user = seed_user(&storage);
        let service = BudgetService::new(&storage);

        let budget = service
            .create(user.id, Money::from_cents(200_000), october())
            .unwrap();
        assert!(budget.is_active);
        assert_eq!(service.list_for_user(user.id).unwrap().len(), 1);
        assert_eq!(
            service.current_for_user(user.id, Some(october())).unwrap().unwrap().id,
            budget.id
        );
    }

    #[test]
    fn test_one_budget_per_month() {
        let (_temp_dir, storage) = create_test_storage();
        let user = seed_user(&storage);
        let service = BudgetService::new(&storage);

        service.create(user.id, Money::from_cents(1_000), october()).unwrap();
        assert!(service
            .create(user.id, Money::from_cents(2_000), october())
            .unwrap_err()
            .is_duplicate());
        assert!(service
            .create(user.id, Money::from_cents(2_000), october().next())
            .is_ok());
    }

    #[test]
    fn test_create_validation() {
        let (_temp_dir, storage) = create_test_storage();
        let user = seed_user(&storage);
        let service = BudgetService::new(&storage);

        assert!(service
            .create(user.id, Money::from_cents(-1), october())
            .unwrap_err()
            .is_validation());
        assert!(service
            .create(UserId::new(), Money::from_cents(1), october())
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_find_for_user() {
        let (_temp_dir, storage) = create_test_storage();
        let user = seed_user(&storage);
        let service = BudgetService::new(&storage);
        let budget = service.create(user.id, Money::from_cents(1_000), october()).unwrap();

        assert!(service.find_for_user(user.id, "2025-10").unwrap().is_some());
        assert!(service.find_for_user(user.id, "10/2025").unwrap().is_some());
        assert!(service
            .find_for_user(user.id, &budget.id.to_string())
            .unwrap()
            .is_some());
        assert!(service.find_for_user(UserId::new(), "2025-10").unwrap().is_none());
    }

    #[test]
    fn test_update_total_recalculates_limits() {
        let (_temp_dir, storage) = create_test_storage();
        let user = seed_user(&storage);
        let food = seed_category(&storage, "Food");
        let service = BudgetService::new(&storage);

        let budget = service.create(user.id, Money::from_cents(100_000), october()).unwrap();
        service.add_category_to_budget(budget.id, food.id, Some(20.0)).unwrap();

        let updated = service.update_total(budget.id, Money::from_cents(150_000)).unwrap();
        assert_eq!(updated.total_amount.cents(), 150_000);

        let link = storage
            .budget_categories
            .get_link(budget.id, food.id)
            .unwrap()
            .unwrap();
        assert_eq!(link.limit_amount.cents(), 30_000);
    }

    #[test]
    fn test_overview() {
        let (_temp_dir, storage) = create_test_storage();
        let user = seed_user(&storage);
        let food = seed_category(&storage, "Food");
        let rent = seed_category(&storage, "Rent");
        let service = BudgetService::new(&storage);

        let budget = service.create(user.id, Money::from_cents(100_000), october()).unwrap();
        service.add_category_to_budget(budget.id, food.id, Some(15.0)).unwrap();
        service.add_category_to_budget(budget.id, rent.id, Some(50.0)).unwrap();

        ExpenseService::new(&storage)
            .add(NewExpense {
                budget_id: budget.id,
                category_id: food.id,
                amount: Money::from_cents(6_000),
                description: "Market".into(),
                date: NaiveDate::from_ymd_opt(2025, 10, 4),
            })
            .unwrap();

        let overview = service.overview(budget.id).unwrap();
        assert_eq!(overview.spent.cents(), 6_000);
        assert_eq!(overview.remaining.cents(), 94_000);
        assert_eq!(overview.progress, 0.06);
        assert_eq!(overview.allocated_percentage, 65.0);
        assert_eq!(overview.unallocated_percentage, 35.0);
        assert!(!overview.is_over_allocated());

        assert_eq!(overview.categories.len(), 2);
        let food_row = &overview.categories[0];
        assert_eq!(food_row.name, "Food");
        assert_eq!(food_row.link.limit_amount.cents(), 15_000);
        assert_eq!(food_row.remaining().cents(), 9_000);
        assert_eq!(food_row.progress(), 0.4);
    }

    #[test]
    fn test_reset_for_new_month() {
        let (_temp_dir, storage) = create_test_storage();
        let user = seed_user(&storage);
        let food = seed_category(&storage, "Food");
        let service = BudgetService::new(&storage);

        let budget = service.create(user.id, Money::from_cents(100_000), october()).unwrap();
        service.add_category_to_budget(budget.id, food.id, Some(10.0)).unwrap();
        ExpenseService::new(&storage)
            .add(NewExpense {
                budget_id: budget.id,
                category_id: food.id,
                amount: Money::from_cents(5_000),
                description: String::new(),
                date: NaiveDate::from_ymd_opt(2025, 10, 4),
            })
            .unwrap();

        let reset = service
            .reset_for_new_month(budget.id, Money::from_cents(200_000), october().next())
            .unwrap();
        assert_eq!(reset.month, october().next());
        assert_eq!(reset.spent_amount, Money::zero());

        let link = storage.budget_categories.get_link(budget.id, food.id).unwrap().unwrap();
        assert_eq!(link.spent_amount, Money::zero());
        assert_eq!(link.limit_amount.cents(), 20_000);
    }

    #[test]
    fn test_reset_rejects_taken_month() {
        let (_temp_dir, storage) = create_test_storage();
        let user = seed_user(&storage);
        let service = BudgetService::new(&storage);

        let budget = service.create(user.id, Money::from_cents(1_000), october()).unwrap();
        service.create(user.id, Money::from_cents(1_000), october().next()).unwrap();

        assert!(service
            .reset_for_new_month(budget.id, Money::from_cents(1_000), october().next())
            .unwrap_err()
            .is_duplicate());
    }

    #[test]
    fn test_delete_cascades() {
        let (_temp_dir, storage) = create_test_storage();
        let user = seed_user(&storage);
        let food = seed_category(&storage, "Food");
        let service = BudgetService::new(&storage);

        let budget = service.create(user.id, Money::from_cents(100_000), october()).unwrap();
        service.add_category_to_budget(budget.id, food.id, Some(10.0)).unwrap();
        ExpenseService::new(&storage)
            .add(NewExpense {
                budget_id: budget.id,
                category_id: food.id,
                amount: Money::from_cents(1_000),
                description: String::new(),
                date: None,
            })
            .unwrap();

        let other = service
            .create(user.id, Money::from_cents(50_000), october().next())
            .unwrap();
        storage.alerts.upsert(Alert::global(user.id, budget.id, 0.9)).unwrap();
        storage.alerts.upsert(Alert::global(user.id, other.id, 0.8)).unwrap();

        service.delete(budget.id).unwrap();
        assert_eq!(storage.budgets.count().unwrap(), 1);
        assert_eq!(storage.budget_categories.count().unwrap(), 0);
        assert_eq!(storage.expenses.count().unwrap(), 0);
        assert_eq!(storage.categories.count().unwrap(), 1);

        let remaining = storage.alerts.get_all().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].budget_id, Some(other.id));
    }

    #[test]
    fn test_set_active_and_membership_queries() {
        let (_temp_dir, storage) = create_test_storage();
        let user = seed_user(&storage);
        let food = seed_category(&storage, "Food");
        let service = BudgetService::new(&storage);

        let budget = service.create(user.id, Money::from_cents(1_000), october()).unwrap();
        assert!(!service.set_active(budget.id, false).unwrap().is_active);

        service.add_category_to_budget(budget.id, food.id, None).unwrap();
        assert_eq!(service.categories_for_budget(budget.id).unwrap().len(), 1);
        assert_eq!(service.budgets_for_category(food.id).unwrap().len(), 1);

        service.remove_category_from_budget(budget.id, food.id).unwrap();
        assert!(service.categories_for_budget(budget.id).unwrap().is_empty());
    }
}
