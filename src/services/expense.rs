//! Expense service
//!
//! Records spending against a budget allocation. Each change moves the
//! amount in or out of the allocation and budget spent totals (both
//! clamped), then re-runs the owner's threshold checks.

use std::collections::HashMap;

use chrono::{Local, NaiveDate};

use crate::audit::EntityType;
use crate::error::{MoneyMateError, MoneyMateResult};
use crate::models::category::DEFAULT_COLOR;
use crate::models::{
    Alert, Budget, BudgetCategory, BudgetCategoryId, BudgetId, BudgetMonth, CategoryId, Expense,
    ExpenseId, Money, UserId,
};
use crate::storage::Storage;

use super::alert::AlertService;
use super::budget_category::BudgetCategoryService;

/// Input for a new expense
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub budget_id: BudgetId,
    pub category_id: CategoryId,
    pub amount: Money,
    pub description: String,
    /// Defaults to today
    pub date: Option<NaiveDate>,
}

/// Fields to change on an existing expense
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    pub amount: Option<Money>,
    pub category_id: Option<CategoryId>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

/// An expense plus any alerts its spending raised
#[derive(Debug, Clone)]
pub struct ExpenseOutcome {
    pub expense: Expense,
    pub alerts: Vec<Alert>,
}

/// History query for one user
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    /// Defaults to the current month
    pub month: Option<BudgetMonth>,
    pub category_id: Option<CategoryId>,
    /// Case-insensitive substring of the description
    pub search: Option<String>,
}

/// Spending of one category within a budget
#[derive(Debug, Clone)]
pub struct ExpenseSummary {
    pub category_id: CategoryId,
    pub name: String,
    pub color_hex: String,
    pub total: Money,
    pub count: usize,
}

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a new expense
    ///
    /// The category must already be linked to the budget.
    pub fn add(&self, input: NewExpense) -> MoneyMateResult<ExpenseOutcome> {
        validate_amount(input.amount)?;

        let budget = self.require_budget(input.budget_id)?;
        let link = self.require_link(&budget, input.category_id)?;

        let expense = Expense::new(
            budget.id,
            link.id,
            link.category_id,
            input.amount,
            input.description.trim(),
            input.date.unwrap_or_else(|| Local::now().date_naive()),
        );
        expense
            .validate()
            .map_err(|e| MoneyMateError::Validation(e.to_string()))?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            non_empty(&expense.description),
            &expense,
        )?;

        let (budget, link) = self.apply(budget.id, Some(link.id), expense.amount)?;
        let alerts = AlertService::new(self.storage).check_after_spending(&budget, link.as_ref())?;

        Ok(ExpenseOutcome { expense, alerts })
    }

    /// Edit an expense, moving its amount between allocations if needed
    pub fn update(&self, id: ExpenseId, changes: ExpenseUpdate) -> MoneyMateResult<ExpenseOutcome> {
        let mut expense = self.require(id)?;
        let before = expense.clone();

        if let Some(amount) = changes.amount {
            validate_amount(amount)?;
            expense.amount = amount;
        }

        let budget = self.require_budget(expense.budget_id)?;
        if let Some(category_id) = changes.category_id {
            let link = self.require_link(&budget, category_id)?;
            expense.budget_category_id = link.id;
            expense.category_id = link.category_id;
        }

        if let Some(description) = changes.description {
            expense.description = description.trim().to_string();
        }

        if let Some(date) = changes.date {
            expense.date = date;
        }

        expense
            .validate()
            .map_err(|e| MoneyMateError::Validation(e.to_string()))?;

        // An expense whose allocation was removed only counts against the budget
        let link_id = self
            .storage
            .budget_categories
            .get(expense.budget_category_id)?
            .map(|link| link.id);

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_update(
            EntityType::Expense,
            expense.id.to_string(),
            non_empty(&expense.description),
            &before,
            &expense,
            None,
        )?;

        // Reverse the old contribution before applying the new one
        self.reverse(&before)?;
        let (budget, link) = self.apply(expense.budget_id, link_id, expense.amount)?;
        let alerts = AlertService::new(self.storage).check_after_spending(&budget, link.as_ref())?;

        Ok(ExpenseOutcome { expense, alerts })
    }

    /// Delete an expense and take its amount back out of the totals
    pub fn delete(&self, id: ExpenseId) -> MoneyMateResult<Expense> {
        let expense = self.require(id)?;

        self.storage.expenses.delete(id)?;
        self.storage.expenses.save()?;

        self.storage.log_delete(
            EntityType::Expense,
            expense.id.to_string(),
            non_empty(&expense.description),
            &expense,
        )?;

        self.reverse(&expense)?;
        Ok(expense)
    }

    pub fn get(&self, id: ExpenseId) -> MoneyMateResult<Option<Expense>> {
        self.storage.expenses.get(id)
    }

    /// Find an expense by ID string among a user's budgets
    pub fn find_for_user(&self, user_id: UserId, identifier: &str) -> MoneyMateResult<Option<Expense>> {
        Ok(self
            .list_for_user(user_id)?
            .into_iter()
            .find(|e| e.id.matches(identifier)))
    }

    /// Every expense, newest first
    pub fn list(&self) -> MoneyMateResult<Vec<Expense>> {
        self.storage.expenses.get_all()
    }

    pub fn list_for_budget(&self, budget_id: BudgetId) -> MoneyMateResult<Vec<Expense>> {
        self.storage.expenses.get_by_budget(budget_id)
    }

    /// Every expense in a user's budgets, newest first
    pub fn list_for_user(&self, user_id: UserId) -> MoneyMateResult<Vec<Expense>> {
        let budget_ids: Vec<_> = self
            .storage
            .budgets
            .get_by_user(user_id)?
            .into_iter()
            .map(|b| b.id)
            .collect();

        let mut expenses = self.storage.expenses.get_all()?;
        expenses.retain(|e| budget_ids.contains(&e.budget_id));
        Ok(expenses)
    }

    /// Sum of a budget's expenses (unclamped)
    pub fn total_for_budget(&self, budget_id: BudgetId) -> MoneyMateResult<Money> {
        Ok(self
            .storage
            .expenses
            .get_by_budget(budget_id)?
            .iter()
            .map(|e| e.amount)
            .sum())
    }

    /// A user's expenses for one month, optionally narrowed, newest first
    pub fn history(&self, user_id: UserId, filter: &HistoryFilter) -> MoneyMateResult<Vec<Expense>> {
        let month = filter.month.unwrap_or_else(BudgetMonth::current);
        let search = filter.search.as_deref().unwrap_or("");

        let mut expenses = self.list_for_user(user_id)?;
        expenses.retain(|e| {
            month.contains(e.date)
                && filter.category_id.map_or(true, |c| e.category_id == c)
                && e.matches_search(search)
        });
        Ok(expenses)
    }

    /// Totals per category for a budget, largest first
    pub fn summary_by_category(&self, budget_id: BudgetId) -> MoneyMateResult<Vec<ExpenseSummary>> {
        let mut by_category: HashMap<CategoryId, (Money, usize)> = HashMap::new();
        for expense in self.storage.expenses.get_by_budget(budget_id)? {
            let entry = by_category.entry(expense.category_id).or_default();
            entry.0 += expense.amount;
            entry.1 += 1;
        }

        let mut summaries = Vec::with_capacity(by_category.len());
        for (category_id, (total, count)) in by_category {
            let (name, color_hex) = match self.storage.categories.get(category_id)? {
                Some(c) => (c.name, c.color_hex),
                None => ("(deleted)".to_string(), DEFAULT_COLOR.to_string()),
            };
            summaries.push(ExpenseSummary {
                category_id,
                name,
                color_hex,
                total,
                count,
            });
        }

        summaries.sort_by(|a, b| b.total.cmp(&a.total).then(a.name.cmp(&b.name)));
        Ok(summaries)
    }

    fn apply(
        &self,
        budget_id: BudgetId,
        link_id: Option<BudgetCategoryId>,
        amount: Money,
    ) -> MoneyMateResult<(Budget, Option<BudgetCategory>)> {
        let link = match link_id {
            Some(id) => Some(BudgetCategoryService::new(self.storage).apply_spent(id, amount)?),
            None => None,
        };

        let mut budget = self.require_budget(budget_id)?;
        budget.add_spent(amount);
        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        Ok((budget, link))
    }

    /// Take an expense's amount back out of its budget and allocation
    ///
    /// Missing rows are skipped; the allocation may have been unlinked.
    fn reverse(&self, expense: &Expense) -> MoneyMateResult<()> {
        if self
            .storage
            .budget_categories
            .get(expense.budget_category_id)?
            .is_some()
        {
            BudgetCategoryService::new(self.storage)
                .apply_spent(expense.budget_category_id, -expense.amount)?;
        }

        if let Some(mut budget) = self.storage.budgets.get(expense.budget_id)? {
            budget.remove_spent(expense.amount);
            self.storage.budgets.upsert(budget)?;
            self.storage.budgets.save()?;
        }

        Ok(())
    }

    fn require(&self, id: ExpenseId) -> MoneyMateResult<Expense> {
        self.storage
            .expenses
            .get(id)?
            .ok_or_else(|| MoneyMateError::expense_not_found(id.to_string()))
    }

    fn require_budget(&self, id: BudgetId) -> MoneyMateResult<Budget> {
        self.storage
            .budgets
            .get(id)?
            .ok_or_else(|| MoneyMateError::budget_not_found(id.to_string()))
    }

    fn require_link(&self, budget: &Budget, category_id: CategoryId) -> MoneyMateResult<BudgetCategory> {
        self.storage
            .budget_categories
            .get_link(budget.id, category_id)?
            .ok_or_else(|| {
                MoneyMateError::Validation(format!(
                    "Category is not part of the {} budget; allocate it first",
                    budget.month
                ))
            })
    }
}

fn validate_amount(amount: Money) -> MoneyMateResult<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(MoneyMateError::Validation(format!(
            "Expense amount must be greater than zero, got {}",
            amount
        )))
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::MoneyMatePaths;
    use crate::models::{AlertKind, Category, User};
    use crate::services::category::CategoryService;
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        storage: Storage,
    }

    struct Seeded {
        user: User,
        budget: Budget,
        food: Category,
        rent: Category,
    }

    fn create_test_storage() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let paths = MoneyMatePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        Fixture {
            _temp_dir: temp_dir,
            storage,
        }
    }

    /// A 1000.00 October budget with Food at 10% and Rent at 50%
    fn seed(storage: &Storage) -> Seeded {
        let user = User::new("Alice", "alice@example.com", "hash", 0.8);
        storage.users.upsert(user.clone()).unwrap();

        let budget = Budget::new(
            user.id,
            Money::from_cents(100_000),
            BudgetMonth::new(2025, 10).unwrap(),
        );
        storage.budgets.upsert(budget.clone()).unwrap();

        let food = Category::new("Food");
        let rent = Category::new("Rent");
        storage.categories.upsert(food.clone()).unwrap();
        storage.categories.upsert(rent.clone()).unwrap();

        let links = BudgetCategoryService::new(storage);
        links.add(budget.id, food.id, Some(10.0)).unwrap();
        links.add(budget.id, rent.id, Some(50.0)).unwrap();

        Seeded {
            user,
            budget,
            food,
            rent,
        }
    }

    fn new_expense(s: &Seeded, category: &Category, cents: i64, day: u32, desc: &str) -> NewExpense {
        NewExpense {
            budget_id: s.budget.id,
            category_id: category.id,
            amount: Money::from_cents(cents),
            description: desc.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 10, day),
        }
    }

    fn link_spent(storage: &Storage, s: &Seeded, category: &Category) -> i64 {
        storage
            .budget_categories
            .get_link(s.budget.id, category.id)
            .unwrap()
            .unwrap()
            .spent_amount
            .cents()
    }

    fn budget_spent(storage: &Storage, s: &Seeded) -> i64 {
        storage.budgets.get(s.budget.id).unwrap().unwrap().spent_amount.cents()
    }

    #[test]
    fn test_add_updates_spent() {
        let fx = create_test_storage();
        let s = seed(&fx.storage);
        let service = ExpenseService::new(&fx.storage);

        let outcome = service
            .add(new_expense(&s, &s.food, 2_500, 3, "Market"))
            .unwrap();
        assert!(outcome.alerts.is_empty());
        assert_eq!(link_spent(&fx.storage, &s, &s.food), 2_500);
        assert_eq!(budget_spent(&fx.storage, &s), 2_500);
        assert_eq!(service.total_for_budget(s.budget.id).unwrap().cents(), 2_500);
    }

    #[test]
    fn test_add_validation() {
        let fx = create_test_storage();
        let s = seed(&fx.storage);
        let service = ExpenseService::new(&fx.storage);

        assert!(service
            .add(new_expense(&s, &s.food, 0, 1, ""))
            .unwrap_err()
            .is_validation());

        let unlinked = Category::new("Travel");
        fx.storage.categories.upsert(unlinked.clone()).unwrap();
        assert!(service
            .add(new_expense(&s, &unlinked, 100, 1, ""))
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_category_alert_raised_at_threshold() {
        let fx = create_test_storage();
        let s = seed(&fx.storage);
        let service = ExpenseService::new(&fx.storage);

        // Food limit is 100.00; 80.00 reaches the 0.8 threshold
        let outcome = service
            .add(new_expense(&s, &s.food, 8_000, 5, "Groceries"))
            .unwrap();
        assert_eq!(outcome.alerts.len(), 1);
        assert_eq!(outcome.alerts[0].kind, AlertKind::Category);
        assert_eq!(outcome.alerts[0].message, "Food: 80% of budget used.");

        // Unread alert suppresses a second one
        let outcome = service
            .add(new_expense(&s, &s.food, 1_000, 6, "Snacks"))
            .unwrap();
        assert!(outcome.alerts.is_empty());
    }

    #[test]
    fn test_global_alert_raised() {
        let fx = create_test_storage();
        let s = seed(&fx.storage);
        let service = ExpenseService::new(&fx.storage);

        let outcome = service
            .add(new_expense(&s, &s.rent, 50_000, 1, "Rent"))
            .unwrap();
        // Rent link is fully used; budget is at 50%
        assert_eq!(outcome.alerts.len(), 1);
        assert_eq!(outcome.alerts[0].message, "Rent: budget exceeded!");

        let outcome = service
            .add(new_expense(&s, &s.food, 30_000, 2, "Party"))
            .unwrap();
        let kinds: Vec<_> = outcome.alerts.iter().map(|a| a.kind).collect();
        assert!(kinds.contains(&AlertKind::Global));
    }

    #[test]
    fn test_spent_is_clamped_and_delete_floors() {
        let fx = create_test_storage();
        let s = seed(&fx.storage);
        let service = ExpenseService::new(&fx.storage);

        let big = service
            .add(new_expense(&s, &s.food, 15_000, 1, "Big"))
            .unwrap();
        assert_eq!(link_spent(&fx.storage, &s, &s.food), 10_000);
        assert_eq!(budget_spent(&fx.storage, &s), 15_000);

        service.delete(big.expense.id).unwrap();
        assert_eq!(link_spent(&fx.storage, &s, &s.food), 0);
        assert_eq!(budget_spent(&fx.storage, &s), 0);
        assert!(service.delete(big.expense.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_moves_amount_between_categories() {
        let fx = create_test_storage();
        let s = seed(&fx.storage);
        let service = ExpenseService::new(&fx.storage);

        let added = service
            .add(new_expense(&s, &s.food, 3_000, 1, "Dinner"))
            .unwrap();

        let updated = service
            .update(
                added.expense.id,
                ExpenseUpdate {
                    amount: Some(Money::from_cents(4_000)),
                    category_id: Some(s.rent.id),
                    description: Some("Deposit".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.expense.category_id, s.rent.id);
        assert_eq!(updated.expense.description, "Deposit");
        assert_eq!(link_spent(&fx.storage, &s, &s.food), 0);
        assert_eq!(link_spent(&fx.storage, &s, &s.rent), 4_000);
        assert_eq!(budget_spent(&fx.storage, &s), 4_000);

        assert!(service
            .update(
                added.expense.id,
                ExpenseUpdate {
                    amount: Some(Money::from_cents(-1)),
                    ..Default::default()
                }
            )
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_update_after_allocation_removed() {
        let fx = create_test_storage();
        let s = seed(&fx.storage);
        let service = ExpenseService::new(&fx.storage);

        let added = service
            .add(new_expense(&s, &s.food, 3_000, 1, "Dinner"))
            .unwrap();
        BudgetCategoryService::new(&fx.storage)
            .remove_link(s.budget.id, s.food.id)
            .unwrap();

        let renamed = service
            .update(
                added.expense.id,
                ExpenseUpdate {
                    description: Some("renamed".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(renamed.expense.description, "renamed");
        assert_eq!(renamed.expense.amount.cents(), 3_000);
        assert_eq!(budget_spent(&fx.storage, &s), 3_000);
        assert_eq!(service.total_for_budget(s.budget.id).unwrap().cents(), 3_000);

        service
            .update(
                added.expense.id,
                ExpenseUpdate {
                    amount: Some(Money::from_cents(5_000)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(budget_spent(&fx.storage, &s), 5_000);

        // Moving it to a linked category charges that allocation again
        service
            .update(
                added.expense.id,
                ExpenseUpdate {
                    category_id: Some(s.rent.id),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(link_spent(&fx.storage, &s, &s.rent), 5_000);
        assert_eq!(budget_spent(&fx.storage, &s), 5_000);
    }

    #[test]
    fn test_delete_after_category_deleted() {
        let fx = create_test_storage();
        let s = seed(&fx.storage);
        let service = ExpenseService::new(&fx.storage);

        let added = service
            .add(new_expense(&s, &s.food, 2_000, 4, "Bakery"))
            .unwrap();
        CategoryService::new(&fx.storage).delete(s.food.id).unwrap();

        let summary = service.summary_by_category(s.budget.id).unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].name, "(deleted)");
        assert_eq!(summary[0].total.cents(), 2_000);

        service.delete(added.expense.id).unwrap();
        assert_eq!(budget_spent(&fx.storage, &s), 0);
        assert_eq!(fx.storage.expenses.count().unwrap(), 0);
    }

    #[test]
    fn test_history_filters() {
        let fx = create_test_storage();
        let s = seed(&fx.storage);
        let service = ExpenseService::new(&fx.storage);

        service.add(new_expense(&s, &s.food, 1_000, 2, "Bakery")).unwrap();
        service.add(new_expense(&s, &s.food, 2_000, 20, "Supermarket")).unwrap();
        service.add(new_expense(&s, &s.rent, 3_000, 10, "October rent")).unwrap();
        service
            .add(NewExpense {
                date: NaiveDate::from_ymd_opt(2025, 11, 1),
                ..new_expense(&s, &s.food, 500, 1, "Late bakery")
            })
            .unwrap();

        let october = Some(BudgetMonth::new(2025, 10).unwrap());

        let all = service
            .history(s.user.id, &HistoryFilter { month: october, ..Default::default() })
            .unwrap();
        let days: Vec<_> = all.iter().map(|e| e.date.format("%d").to_string()).collect();
        assert_eq!(days, vec!["20", "10", "02"]);

        let food = service
            .history(
                s.user.id,
                &HistoryFilter {
                    month: october,
                    category_id: Some(s.food.id),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(food.len(), 2);

        let search = service
            .history(
                s.user.id,
                &HistoryFilter {
                    month: october,
                    search: Some("BAKERY".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(search.len(), 1);

        assert!(service
            .history(UserId::new(), &HistoryFilter { month: october, ..Default::default() })
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_summary_by_category() {
        let fx = create_test_storage();
        let s = seed(&fx.storage);
        let service = ExpenseService::new(&fx.storage);

        service.add(new_expense(&s, &s.food, 1_000, 1, "")).unwrap();
        service.add(new_expense(&s, &s.food, 1_500, 2, "")).unwrap();
        service.add(new_expense(&s, &s.rent, 9_000, 3, "")).unwrap();

        let summary = service.summary_by_category(s.budget.id).unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].name, "Rent");
        assert_eq!(summary[0].total.cents(), 9_000);
        assert_eq!(summary[1].name, "Food");
        assert_eq!(summary[1].total.cents(), 2_500);
        assert_eq!(summary[1].count, 2);
        assert_eq!(summary[1].color_hex, "#CCCCCC");
    }
}
