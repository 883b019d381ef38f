//! Alert repository for JSON storage
//!
//! Manages loading and saving alerts to alerts.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::MoneyMateError;
use crate::models::{Alert, AlertId, UserId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct AlertData {
    alerts: Vec<Alert>,
}

/// Repository for alert persistence
pub struct AlertRepository {
    path: PathBuf,
    data: RwLock<HashMap<AlertId, Alert>>,
}

impl AlertRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load alerts from disk
    pub fn load(&self) -> Result<(), MoneyMateError> {
        let file_data: AlertData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for alert in file_data.alerts {
            data.insert(alert.id, alert);
        }

        Ok(())
    }

    /// Save alerts to disk
    pub fn save(&self) -> Result<(), MoneyMateError> {
        let file_data = AlertData {
            alerts: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: AlertId) -> Result<Option<Alert>, MoneyMateError> {
        let data = self.data.read().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// All alerts, newest first
    pub fn get_all(&self) -> Result<Vec<Alert>, MoneyMateError> {
        let data = self.data.read().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut alerts: Vec<_> = data.values().cloned().collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(alerts)
    }

    /// Alerts for one user, newest first
    pub fn get_by_user(&self, user_id: UserId) -> Result<Vec<Alert>, MoneyMateError> {
        let mut alerts = self.get_all()?;
        alerts.retain(|a| a.user_id == user_id);
        Ok(alerts)
    }

    pub fn upsert(&self, alert: Alert) -> Result<(), MoneyMateError> {
        let mut data = self.data.write().map_err(|e| {
            MoneyMateError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(alert.id, alert);
        Ok(())
    }

    pub fn delete(&self, id: AlertId) -> Result<bool, MoneyMateError> {
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
