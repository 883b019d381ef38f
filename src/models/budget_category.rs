//! BudgetCategory model
//!
//! The link between one budget and one category. It carries the share of
//! the budget given to the category and tracks spending against that share.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetCategoryId, BudgetId, CategoryId};
use super::money::Money;

/// Percentage used when none is given
pub const DEFAULT_PERCENTAGE: f64 = 10.0;

/// A category's allocation within a budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub id: BudgetCategoryId,

    pub budget_id: BudgetId,

    pub category_id: CategoryId,

    /// Share of the budget total, 0..=100
    pub percentage: f64,

    /// `percentage` of the budget total, rounded to the cent
    pub limit_amount: Money,

    /// Spending against this allocation, never above `limit_amount`
    #[serde(default)]
    pub spent_amount: Money,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl BudgetCategory {
    /// Link a category to a budget, computing the limit from `budget_total`
    pub fn new(
        budget_id: BudgetId,
        category_id: CategoryId,
        percentage: f64,
        budget_total: Money,
    ) -> Self {
        let now = Utc::now();
        let mut link = Self {
            id: BudgetCategoryId::new(),
            budget_id,
            category_id,
            percentage: 0.0,
            limit_amount: Money::zero(),
            spent_amount: Money::zero(),
            created_at: now,
            updated_at: now,
        };
        link.set_percentage(percentage, budget_total);
        link
    }

    /// Set the percentage (clamped to 0..=100) and recompute the limit
    pub fn set_percentage(&mut self, percentage: f64, budget_total: Money) {
        self.percentage = clamp_percentage(percentage);
        self.recalculate_limit(budget_total);
    }

    /// Recompute the limit after the budget total changed
    pub fn recalculate_limit(&mut self, budget_total: Money) {
        self.percentage = clamp_percentage(self.percentage);
        self.limit_amount = budget_total.percentage(self.percentage);
        self.spent_amount = self
            .spent_amount
            .clamp_between(Money::zero(), self.limit_amount);
        self.updated_at = Utc::now();
    }

    pub fn remaining_amount(&self) -> Money {
        self.limit_amount - self.spent_amount
    }

    /// Fraction of the limit spent; `None` when the limit is zero
    pub fn usage_ratio(&self) -> Option<f64> {
        if self.limit_amount.is_zero() {
            None
        } else {
            Some(self.spent_amount.ratio_of(self.limit_amount))
        }
    }

    /// Record spending, clamped to the limit
    pub fn add_spent(&mut self, amount: Money) {
        self.spent_amount =
            (self.spent_amount + amount).clamp_between(Money::zero(), self.limit_amount);
        self.updated_at = Utc::now();
    }

    /// Reverse spending, floored at zero
    pub fn remove_spent(&mut self, amount: Money) {
        self.add_spent(-amount);
    }
}

impl fmt::Display for BudgetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}% ({})", self.percentage, self.limit_amount)
    }
}

fn clamp_percentage(percentage: f64) -> f64 {
    if percentage.is_nan() {
        0.0
    } else {
        percentage.clamp(0.0, 100.0)
    }
}
