//! Authentication service
//!
//! Registration, login/logout against the session file, and account
//! settings for the logged-in user.

use crate::audit::EntityType;
use crate::crypto::{hash_password, verify_password, PasswordChecks, MIN_LOGIN_PASSWORD_LENGTH};
use crate::error::{MoneyMateError, MoneyMateResult};
use crate::models::user::is_valid_email;
use crate::models::{User, UserId};
use crate::storage::{Session, Storage};

/// Service for user accounts and sessions
pub struct AuthService<'a> {
    storage: &'a Storage,
}

impl<'a> AuthService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a new user
    ///
    /// All fields are required, the email must look like an address and
    /// the password must satisfy every strength rule.
    pub fn register(&self, name: &str, email: &str, password: &str) -> MoneyMateResult<User> {
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(MoneyMateError::Validation("All fields are required".into()));
        }

        if !is_valid_email(email) {
            return Err(MoneyMateError::Validation(format!(
                "Invalid email address: {}",
                email
            )));
        }

        let checks = PasswordChecks::of(password);
        if !checks.is_strong() {
            return Err(MoneyMateError::Validation(format!(
                "Password must contain {}",
                checks.missing().join(", ")
            )));
        }

        if self.storage.users.get_by_email(email)?.is_some() {
            return Err(MoneyMateError::Duplicate {
                entity_type: "User",
                identifier: email.to_string(),
            });
        }

        let user = User::new(
            name,
            email,
            hash_password(password)?,
            self.storage.settings().default_alert_threshold,
        );
        user.validate()
            .map_err(|e| MoneyMateError::Validation(e.to_string()))?;

        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_create(
            EntityType::User,
            user.id.to_string(),
            Some(user.name.clone()),
            &user,
        )?;

        Ok(user)
    }

    /// Log in and open a session
    pub fn login(&self, email: &str, password: &str, remember_me: bool) -> MoneyMateResult<User> {
        let email = email.trim();

        if email.is_empty() || password.is_empty() {
            return Err(MoneyMateError::Validation(
                "Email and password are required".into(),
            ));
        }

        if !is_valid_email(email) {
            return Err(MoneyMateError::Validation(format!(
                "Invalid email address: {}",
                email
            )));
        }

        if password.chars().count() < MIN_LOGIN_PASSWORD_LENGTH {
            return Err(MoneyMateError::Validation(format!(
                "Password must be at least {} characters",
                MIN_LOGIN_PASSWORD_LENGTH
            )));
        }

        let invalid = || MoneyMateError::Auth("Invalid email or password".into());

        let mut user = self.storage.users.get_by_email(email)?.ok_or_else(invalid)?;
        if !user.is_active || !verify_password(password, &user.password_hash)? {
            return Err(invalid());
        }

        let before = user.clone();
        user.update_last_login();
        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_update(
            EntityType::User,
            user.id.to_string(),
            Some(user.name.clone()),
            &before,
            &user,
            Some("login".into()),
        )?;

        self.storage
            .session
            .save(&Session::new(user.id, remember_me))?;

        Ok(user)
    }

    pub fn logout(&self) -> MoneyMateResult<()> {
        self.storage.session.clear()
    }

    /// The logged-in user, if the session is valid and the user still active
    pub fn current_user(&self) -> MoneyMateResult<Option<User>> {
        let Some(session) = self.storage.session.load()? else {
            return Ok(None);
        };

        match self.storage.users.get(session.user_id)? {
            Some(user) if user.is_active => Ok(Some(user)),
            _ => {
                self.storage.session.clear()?;
                Ok(None)
            }
        }
    }

    pub fn current_user_id(&self) -> MoneyMateResult<Option<UserId>> {
        Ok(self.current_user()?.map(|u| u.id))
    }

    /// The logged-in user or an "not logged in" error
    pub fn require_user(&self) -> MoneyMateResult<User> {
        self.current_user()?
            .ok_or_else(MoneyMateError::not_logged_in)
    }

    pub fn get(&self, id: UserId) -> MoneyMateResult<Option<User>> {
        self.storage.users.get(id)
    }

    /// Change the fraction of a budget at which alerts fire
    pub fn update_alert_threshold(&self, id: UserId, threshold: f64) -> MoneyMateResult<User> {
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(MoneyMateError::Validation(format!(
                "Alert threshold must be greater than 0 and at most 1, got {}",
                threshold
            )));
        }

        let mut user = self
            .storage
            .users
            .get(id)?
            .ok_or_else(|| MoneyMateError::user_not_found(id.to_string()))?;

        let before = user.clone();
        user.alert_threshold = threshold;

        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_update(
            EntityType::User,
            user.id.to_string(),
            Some(user.name.clone()),
            &before,
            &user,
            None,
        )?;

        Ok(user)
    }

    /// Deactivate an account and end its session
    pub fn deactivate(&self, id: UserId) -> MoneyMateResult<User> {
        let mut user = self
            .storage
            .users
            .get(id)?
            .ok_or_else(|| MoneyMateError::user_not_found(id.to_string()))?;

        let before = user.clone();
        user.deactivate();

        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_update(
            EntityType::User,
            user.id.to_string(),
            Some(before.name.clone()),
            &before,
            &user,
            Some("deactivated".into()),
        )?;

        if let Some(session) = self.storage.session.load()? {
            if session.user_id == id {
                self.storage.session.clear()?;
            }
        }

        Ok(user)
    }
}
