//! Statistics service
//!
//! Aggregates a user's budgets and expenses over months and years.

use std::collections::HashMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::error::MoneyMateResult;
use crate::models::category::DEFAULT_COLOR;
use crate::models::{Budget, BudgetMonth, CategoryId, Expense, Money, UserId};
use crate::storage::Storage;

use super::expense::ExpenseService;

/// A span of time statistics are computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Month(BudgetMonth),
    Year(i32),
}

impl Period {
    /// Parse "2025", "2025-10", "10/2025" or a month keyword such as "current"
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.len() == 4 {
            if let Ok(year) = s.parse::<i32>() {
                return Some(Self::Year(year));
            }
        }
        BudgetMonth::parse(s).ok().map(Self::Month)
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        match self {
            Self::Month(month) => month.contains(date),
            Self::Year(year) => date.year() == *year,
        }
    }

    pub fn contains_month(&self, month: BudgetMonth) -> bool {
        match self {
            Self::Month(m) => *m == month,
            Self::Year(year) => month.year == *year,
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::Month(BudgetMonth::current())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month(month) => write!(f, "{}", month.friendly()),
            Self::Year(year) => write!(f, "{}", year),
        }
    }
}

/// Budgeted and spent amounts for one month
#[derive(Debug, Clone)]
pub struct MonthlyTotal {
    pub month: BudgetMonth,
    /// Total of the month's budget, zero when there is none
    pub budgeted: Money,
    /// Expenses dated in the month
    pub spent: Money,
}

/// Totals over a period
#[derive(Debug, Clone)]
pub struct PeriodSummary {
    pub period: Period,
    pub budgeted: Money,
    pub spent: Money,
    pub remaining: Money,
    pub expense_count: usize,
}

impl PeriodSummary {
    /// Fraction of the budgeted amount spent
    pub fn progress(&self) -> f64 {
        self.spent.ratio_of(self.budgeted)
    }
}

/// Spending of one category over a period
#[derive(Debug, Clone)]
pub struct CategoryTotal {
    pub category_id: CategoryId,
    pub name: String,
    pub color_hex: String,
    pub total: Money,
    pub count: usize,
    /// Share of the period's spending, 0..=100
    pub share: f64,
}

/// Service for spending statistics
pub struct StatisticsService<'a> {
    storage: &'a Storage,
}

impl<'a> StatisticsService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// One row per month of `year`, January first
    pub fn monthly_totals(&self, user_id: UserId, year: i32) -> MoneyMateResult<Vec<MonthlyTotal>> {
        let budgets = self.storage.budgets.get_by_user(user_id)?;
        let expenses = ExpenseService::new(self.storage).list_for_user(user_id)?;

        let mut totals = Vec::with_capacity(12);
        for m in 1..=12 {
            let month = BudgetMonth { year, month: m };
            let budgeted = budgeted_in(&budgets, Period::Month(month));
            let spent = expenses
                .iter()
                .filter(|e| month.contains(e.date))
                .map(|e| e.amount)
                .sum();
            totals.push(MonthlyTotal {
                month,
                budgeted,
                spent,
            });
        }

        Ok(totals)
    }

    /// Budgeted, spent and remaining over a month or a year
    pub fn period_summary(&self, user_id: UserId, period: Period) -> MoneyMateResult<PeriodSummary> {
        let budgets = self.storage.budgets.get_by_user(user_id)?;
        let expenses = self.expenses_in(user_id, period)?;

        let budgeted = budgeted_in(&budgets, period);
        let spent: Money = expenses.iter().map(|e| e.amount).sum();

        Ok(PeriodSummary {
            period,
            budgeted,
            spent,
            remaining: budgeted - spent,
            expense_count: expenses.len(),
        })
    }

    /// Categories ranked by spending over a period, at most `limit` rows
    pub fn top_categories(
        &self,
        user_id: UserId,
        period: Period,
        limit: usize,
    ) -> MoneyMateResult<Vec<CategoryTotal>> {
        let expenses = self.expenses_in(user_id, period)?;
        let grand_total: Money = expenses.iter().map(|e| e.amount).sum();

        let mut by_category: HashMap<CategoryId, (Money, usize)> = HashMap::new();
        for expense in &expenses {
            let entry = by_category.entry(expense.category_id).or_default();
            entry.0 += expense.amount;
            entry.1 += 1;
        }

        let mut rows = Vec::with_capacity(by_category.len());
        for (category_id, (total, count)) in by_category {
            let (name, color_hex) = match self.storage.categories.get(category_id)? {
                Some(c) => (c.name, c.color_hex),
                None => ("(deleted)".to_string(), DEFAULT_COLOR.to_string()),
            };
            rows.push(CategoryTotal {
                category_id,
                name,
                color_hex,
                total,
                count,
                share: total.ratio_of(grand_total) * 100.0,
            });
        }

        rows.sort_by(|a, b| b.total.cmp(&a.total).then(a.name.cmp(&b.name)));
        rows.truncate(limit);
        Ok(rows)
    }

    fn expenses_in(&self, user_id: UserId, period: Period) -> MoneyMateResult<Vec<Expense>> {
        let mut expenses = ExpenseService::new(self.storage).list_for_user(user_id)?;
        expenses.retain(|e| period.contains_date(e.date));
        Ok(expenses)
    }
}

fn budgeted_in(budgets: &[Budget], period: Period) -> Money {
    budgets
        .iter()
        .filter(|b| period.contains_month(b.month))
        .map(|b| b.total_amount)
        .sum()
}
