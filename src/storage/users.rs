//! User repository for JSON storage
//!
//! Manages loading and saving users to users.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::MoneyMateError;
use crate::models::{User, UserId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    users: Vec<User>,
}

/// Repository for user persistence
pub struct UserRepository {
    path: PathBuf,
    data: RwLock<HashMap<UserId, User>>,
}

impl UserRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load users from disk
    pub fn load(&self) -> Result<(), MoneyMateError> {
        let file_data: UserData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for user in file_data.users {
            data.insert(user.id, user);
        }

        Ok(())
    }

    /// Save users to disk
    pub fn save(&self) -> Result<(), MoneyMateError> {
        let file_data = UserData {
            users: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: UserId) -> Result<Option<User>, MoneyMateError> {
        let data = self.data.read().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// All users, oldest registration first
    pub fn get_all(&self) -> Result<Vec<User>, MoneyMateError> {
        let data = self.data.read().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    /// Find a user by email (case-insensitive)
    pub fn get_by_email(&self, email: &str) -> Result<Option<User>, MoneyMateError> {
        let data = self.data.read().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let email = email.trim();
        Ok(data
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    pub fn upsert(&self, user: User) -> Result<(), MoneyMateError> {
        let mut data = self.data.write().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(user.id, user);
        Ok(())
    }

    pub fn delete(&self, id: UserId) -> Result<bool, MoneyMateError> {
        let mut data = self.data.write().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, MoneyMateError> {
        let data = self.data.read().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.len())
    }
}
