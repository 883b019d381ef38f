//! Core data models for MoneyMate
//!
//! Flat records for users, monthly budgets, categories, the budget/category
//! allocation link, expenses and alerts, plus the value types they share.

pub mod alert;
pub mod budget;
pub mod budget_category;
pub mod category;
pub mod expense;
pub mod ids;
pub mod money;
pub mod month;
pub mod user;

pub use alert::{Alert, AlertKind};
pub use budget::Budget;
pub use budget_category::BudgetCategory;
pub use category::Category;
pub use expense::Expense;
pub use ids::{AlertId, BudgetCategoryId, BudgetId, CategoryId, ExpenseId, UserId};
pub use money::Money;
pub use month::BudgetMonth;
pub use user::User;
