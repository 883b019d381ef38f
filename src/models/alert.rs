//! Alert model
//!
//! Alerts are raised when spending crosses a user's threshold, either on a
//! whole budget (`Global`) or on one category allocation (`Category`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AlertId, BudgetId, CategoryId, UserId};

/// What an alert is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Global,
    Category,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "Global"),
            Self::Category => write!(f, "Category"),
        }
    }
}

/// A threshold notification for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,

    pub user_id: UserId,

    #[serde(default)]
    pub budget_id: Option<BudgetId>,

    #[serde(default)]
    pub category_id: Option<CategoryId>,

    pub kind: AlertKind,

    pub message: String,

    pub created_at: DateTime<Utc>,

    /// Set when the user has read the alert
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
}

impl Alert {
    pub fn new(
        user_id: UserId,
        budget_id: Option<BudgetId>,
        category_id: Option<CategoryId>,
        kind: AlertKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: AlertId::new(),
            user_id,
            budget_id,
            category_id,
            kind,
            message: message.into(),
            created_at: Utc::now(),
            read_at: None,
        }
    }

    /// A budget-wide alert for the given usage ratio
    pub fn global(user_id: UserId, budget_id: BudgetId, ratio: f64) -> Self {
        Self::new(
            user_id,
            Some(budget_id),
            None,
            AlertKind::Global,
            threshold_message("Global", ratio),
        )
    }

    /// A per-category alert for the given usage ratio
    pub fn category(
        user_id: UserId,
        budget_id: BudgetId,
        category_id: CategoryId,
        category_name: &str,
        ratio: f64,
    ) -> Self {
        Self::new(
            user_id,
            Some(budget_id),
            Some(category_id),
            AlertKind::Category,
            threshold_message(category_name, ratio),
        )
    }

    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }

    /// Mark as read; the first read time is kept
    pub fn mark_as_read(&mut self) {
        if self.read_at.is_none() {
            self.read_at = Some(Utc::now());
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Build the alert text for a scope at a usage ratio
pub fn threshold_message(scope: &str, ratio: f64) -> String {
    if ratio >= 1.0 {
        format!("{}: budget exceeded!", scope)
    } else {
        format!("{}: {:.0}% of budget used.", scope, ratio * 100.0)
    }
}
