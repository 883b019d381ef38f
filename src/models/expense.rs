//! Expense model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetCategoryId, BudgetId, CategoryId, ExpenseId};
use super::money::Money;

/// A single expense recorded against a budget allocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,

    pub budget_id: BudgetId,

    /// The allocation the amount was charged to
    pub budget_category_id: BudgetCategoryId,

    /// Denormalized from the allocation for filtering
    pub category_id: CategoryId,

    /// Amount spent, always positive
    pub amount: Money,

    #[serde(default)]
    pub description: String,

    /// Day the money was spent
    pub date: NaiveDate,

    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        budget_id: BudgetId,
        budget_category_id: BudgetCategoryId,
        category_id: CategoryId,
        amount: Money,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            budget_id,
            budget_category_id,
            category_id,
            amount,
            description: description.into(),
            date,
            created_at: Utc::now(),
        }
    }

    /// Case-insensitive substring match on the description
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim();
        query.is_empty()
            || self
                .description
                .to_lowercase()
                .contains(&query.to_lowercase())
    }

    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if !self.amount.is_positive() {
            return Err(ExpenseValidationError::NonPositiveAmount(self.amount));
        }

        if self.description.len() > 255 {
            return Err(ExpenseValidationError::DescriptionTooLong(
                self.description.len(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.amount, self.description)
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    NonPositiveAmount(Money),
    DescriptionTooLong(usize),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(a) => {
                write!(f, "Expense amount must be greater than zero, got {}", a)
            }
            Self::DescriptionTooLong(len) => {
                write!(f, "Description too long ({} chars, max 255)", len)
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(cents: i64, description: &str) -> Expense {
        Expense::new(
            BudgetId::new(),
            BudgetCategoryId::new(),
            CategoryId::new(),
            Money::from_cents(cents),
            description,
            NaiveDate::from_ymd_opt(2025, 10, 12).unwrap(),
        )
    }

    #[test]
    fn test_amount_must_be_positive() {
        assert!(expense(1, "").validate().is_ok());
        assert!(matches!(
            expense(0, "").validate(),
            Err(ExpenseValidationError::NonPositiveAmount(_))
        ));
        assert!(expense(-500, "").validate().is_err());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let e = expense(1_250, "Weekly Groceries at Market");
        assert!(e.matches_search("groceries"));
        assert!(e.matches_search("MARKET"));
        assert!(e.matches_search(""));
        assert!(!e.matches_search("rent"));
    }
}
