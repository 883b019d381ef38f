//! Budget model
//!
//! A budget is a user's spending envelope for one calendar month.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, UserId};
use super::money::Money;
use super::month::BudgetMonth;

/// A monthly budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,

    /// Owner of the budget
    pub user_id: UserId,

    /// Total amount available for the month
    pub total_amount: Money,

    /// The month this budget covers
    pub month: BudgetMonth,

    /// Amount spent so far, never above `total_amount`
    #[serde(default)]
    pub spent_amount: Money,

    #[serde(default = "default_active")]
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Budget {
    /// Create a new budget
    pub fn new(user_id: UserId, total_amount: Money, month: BudgetMonth) -> Self {
        Self {
            id: BudgetId::new(),
            user_id,
            total_amount,
            month,
            spent_amount: Money::zero(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn remaining_amount(&self) -> Money {
        self.total_amount - self.spent_amount
    }

    /// Fraction of the total spent (0.0 when the total is zero)
    pub fn usage_ratio(&self) -> f64 {
        self.spent_amount.ratio_of(self.total_amount)
    }

    /// Whether the budget covers the month containing today
    pub fn is_for_current_month(&self) -> bool {
        self.month.is_current()
    }

    /// Record spending, clamped so spent never exceeds the total
    pub fn add_spent(&mut self, amount: Money) {
        self.spent_amount =
            (self.spent_amount + amount).clamp_between(Money::zero(), self.total_amount);
    }

    /// Reverse previously recorded spending, floored at zero
    pub fn remove_spent(&mut self, amount: Money) {
        self.add_spent(-amount);
    }

    /// Change the total, re-clamping the spent amount
    pub fn set_total(&mut self, total: Money) {
        self.total_amount = total;
        self.spent_amount = self.spent_amount.clamp_between(Money::zero(), total);
    }

    /// Reuse this budget for a new month with a fresh total
    pub fn reset_for_month(&mut self, total: Money, month: BudgetMonth) {
        self.total_amount = total;
        self.spent_amount = Money::zero();
        self.month = month;
        self.is_active = true;
        self.created_at = Utc::now();
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.total_amount.is_negative() {
            return Err(BudgetValidationError::NegativeTotal);
        }

        if self.spent_amount.is_negative() || self.spent_amount > self.total_amount {
            return Err(BudgetValidationError::SpentOutOfRange);
        }

        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.month.friendly(), self.total_amount)
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NegativeTotal,
    SpentOutOfRange,
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeTotal => write!(f, "Budget total cannot be negative"),
            Self::SpentOutOfRange => write!(f, "Spent amount must be between 0 and the total"),
        }
    }
}

impl std::error::Error for BudgetValidationError {}
