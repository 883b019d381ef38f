//! Category model
//!
//! Categories are global, reusable spending labels. A category is tied to a
//! budget only through a [`BudgetCategory`](super::BudgetCategory) link.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;

/// Colour given to categories created without one
pub const DEFAULT_COLOR: &str = "#CCCCCC";

/// A spending category (e.g., "Groceries")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name
    pub name: String,

    /// Display colour as `#RRGGBB`
    #[serde(default = "default_color")]
    pub color_hex: String,

    /// When the category was created
    pub created_at: DateTime<Utc>,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Category {
    /// Create a new category with the default colour
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            color_hex: default_color(),
            created_at: Utc::now(),
        }
    }

    /// Create a new category with a specific colour
    pub fn with_color(name: impl Into<String>, color_hex: impl Into<String>) -> Self {
        let mut category = Self::new(name);
        category.color_hex = normalize_color(&color_hex.into());
        category
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        if !is_valid_color(&self.color_hex) {
            return Err(CategoryValidationError::InvalidColor(self.color_hex.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Uppercase a colour and add the leading `#` if missing
pub fn normalize_color(color: &str) -> String {
    let trimmed = color.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    format!("#{}", hex.to_ascii_uppercase())
}

/// Check for a `#RRGGBB` colour
pub fn is_valid_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidColor(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 100)", len)
            }
            Self::InvalidColor(c) => write!(f, "Invalid colour '{}' (expected #RRGGBB)", c),
        }
    }
}

impl std::error::Error for CategoryValidationError {}
