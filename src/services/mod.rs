//! Service layer for MoneyMate
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, computed fields, and cross-entity operations.

pub mod alert;
pub mod auth;
pub mod budget;
pub mod budget_category;
pub mod category;
pub mod expense;
pub mod statistics;

pub use alert::AlertService;
pub use auth::AuthService;
pub use budget::{BudgetOverview, BudgetService, CategoryBudgetSummary};
pub use budget_category::{percentage_for_amount, preview_amount, BudgetCategoryService};
pub use category::CategoryService;
pub use expense::{
    ExpenseOutcome, ExpenseService, ExpenseSummary, ExpenseUpdate, HistoryFilter, NewExpense,
};
pub use statistics::{CategoryTotal, MonthlyTotal, Period, PeriodSummary, StatisticsService};
