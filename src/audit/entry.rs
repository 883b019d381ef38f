//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Fields never written to the audit log
const REDACTED_FIELDS: &[&str] = &["password_hash"];

/// Kind of change recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Record types that are audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    User,
    Budget,
    Category,
    BudgetCategory,
    Expense,
    Alert,
}

impl EntityType {
    /// Parse a CLI filter value ("budget", "budget-category", ...)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "user" | "users" => Some(Self::User),
            "budget" | "budgets" => Some(Self::Budget),
            "category" | "categories" => Some(Self::Category),
            "budget_category" | "allocation" | "allocations" => Some(Self::BudgetCategory),
            "expense" | "expenses" => Some(Self::Expense),
            "alert" | "alerts" => Some(Self::Alert),
            _ => None,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityType::User => "User",
            EntityType::Budget => "Budget",
            EntityType::Category => "Category",
            EntityType::BudgetCategory => "Allocation",
            EntityType::Expense => "Expense",
            EntityType::Alert => "Alert",
        };
        write!(f, "{}", name)
    }
}

/// One line of the audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    pub entity_id: String,

    /// Human-readable label (category name, budget month, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// State before an update or delete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    /// State after a create or update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn base(
        operation: Operation,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        let mut entry = Self::base(Operation::Create, entity_type, entity_id.into(), entity_name);
        entry.after = snapshot(entity);
        entry
    }

    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        let mut entry = Self::base(Operation::Update, entity_type, entity_id.into(), entity_name);
        entry.before = snapshot(before);
        entry.after = snapshot(after);
        entry.diff_summary = diff_summary;
        entry
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        let mut entry = Self::base(Operation::Delete, entity_type, entity_id.into(), entity_name);
        entry.before = snapshot(entity);
        entry
    }

    /// One-line summary for terminal output, with the diff on a second line
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

/// Serialize an entity for the log with secrets removed
pub fn snapshot<T: Serialize>(entity: &T) -> Option<Value> {
    let mut value = serde_json::to_value(entity).ok()?;
    if let Value::Object(map) = &mut value {
        for field in REDACTED_FIELDS {
            map.remove(*field);
        }
    }
    Some(value)
}
