//! User model
//!
//! A user owns budgets and receives alerts. Credentials are stored as an
//! Argon2 PHC string; the plain password never reaches this type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UserId;

/// Default fraction of a budget that triggers an alert
pub const DEFAULT_ALERT_THRESHOLD: f64 = 0.8;

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Login email (unique, compared case-insensitively)
    pub email: String,

    /// Argon2 PHC hash of the password
    pub password_hash: String,

    /// Fraction of a budget (0 < t <= 1) at which alerts are raised
    #[serde(default = "default_threshold")]
    pub alert_threshold: f64,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_threshold() -> f64 {
    DEFAULT_ALERT_THRESHOLD
}

fn default_active() -> bool {
    true
}

impl User {
    /// Create a new active user
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        alert_threshold: f64,
    ) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            alert_threshold,
            created_at: Utc::now(),
            last_login: None,
            is_active: true,
        }
    }

    pub fn update_last_login(&mut self) {
        self.last_login = Some(Utc::now());
    }

    /// Deactivate the account and scrub identifying data
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.name = "Deleted user".to_string();
        self.email = format!("deleted_{}@moneymate.local", self.id.as_uuid());
    }

    /// Validate the user
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(UserValidationError::NameTooLong(self.name.len()));
        }

        if self.email.len() > 255 || !is_valid_email(&self.email) {
            return Err(UserValidationError::InvalidEmail(self.email.clone()));
        }

        if !(self.alert_threshold > 0.0 && self.alert_threshold <= 1.0) {
            return Err(UserValidationError::InvalidThreshold(self.alert_threshold));
        }

        Ok(())
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Check an address has the `local@domain.tld` shape with no whitespace
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Validation errors for users
#[derive(Debug, Clone, PartialEq)]
pub enum UserValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidEmail(String),
    InvalidThreshold(f64),
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name cannot be empty"),
            Self::NameTooLong(len) => write!(f, "Name too long ({} chars, max 100)", len),
            Self::InvalidEmail(email) => write!(f, "Invalid email address: {}", email),
            Self::InvalidThreshold(t) => {
                write!(f, "Alert threshold must be between 0 and 1, got {}", t)
            }
        }
    }
}

impl std::error::Error for UserValidationError {}
