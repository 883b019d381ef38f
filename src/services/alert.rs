//! Alert service
//!
//! Raises threshold alerts after spending changes and manages their read
//! state. A new alert is only created when no unread alert of the same kind
//! exists for the same budget (and category).

use chrono::Utc;

use crate::audit::EntityType;
use crate::error::{MoneyMateError, MoneyMateResult};
use crate::models::{Alert, AlertId, AlertKind, Budget, BudgetCategory, BudgetId, CategoryId, UserId};
use crate::storage::Storage;

/// Service for threshold alerts
pub struct AlertService<'a> {
    storage: &'a Storage,
}

impl<'a> AlertService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Raise a budget-wide alert if spending reached `threshold`
    pub fn check_budget_threshold(
        &self,
        budget: &Budget,
        threshold: f64,
    ) -> MoneyMateResult<Option<Alert>> {
        let ratio = budget.usage_ratio();
        if ratio < threshold {
            return Ok(None);
        }

        if self.has_unread(budget.user_id, AlertKind::Global, budget.id, None)? {
            return Ok(None);
        }

        let alert = Alert::global(budget.user_id, budget.id, ratio);
        self.insert(&alert)?;
        Ok(Some(alert))
    }

    /// Raise a category alert if spending reached `threshold` of its limit
    ///
    /// Links with a zero limit never alert.
    pub fn check_category_threshold(
        &self,
        link: &BudgetCategory,
        user_id: UserId,
        threshold: f64,
    ) -> MoneyMateResult<Option<Alert>> {
        let Some(ratio) = link.usage_ratio() else {
            return Ok(None);
        };
        if ratio < threshold {
            return Ok(None);
        }

        if self.has_unread(user_id, AlertKind::Category, link.budget_id, Some(link.category_id))? {
            return Ok(None);
        }

        let name = self
            .storage
            .categories
            .get(link.category_id)?
            .map(|c| c.name)
            .unwrap_or_else(|| "Category".to_string());

        let alert = Alert::category(user_id, link.budget_id, link.category_id, &name, ratio);
        self.insert(&alert)?;
        Ok(Some(alert))
    }

    /// Run both checks for a budget owner after an expense change
    pub fn check_after_spending(
        &self,
        budget: &Budget,
        link: Option<&BudgetCategory>,
    ) -> MoneyMateResult<Vec<Alert>> {
        let threshold = self
            .storage
            .users
            .get(budget.user_id)?
            .map(|u| u.alert_threshold)
            .unwrap_or(self.storage.settings().default_alert_threshold);

        let mut raised = Vec::new();
        raised.extend(self.check_budget_threshold(budget, threshold)?);
        if let Some(link) = link {
            raised.extend(self.check_category_threshold(link, budget.user_id, threshold)?);
        }
        Ok(raised)
    }

    pub fn get(&self, id: AlertId) -> MoneyMateResult<Option<Alert>> {
        self.storage.alerts.get(id)
    }

    /// Find one of a user's alerts by ID string
    pub fn find_for_user(&self, user_id: UserId, identifier: &str) -> MoneyMateResult<Option<Alert>> {
        Ok(self
            .storage
            .alerts
            .get_by_user(user_id)?
            .into_iter()
            .find(|a| a.id.matches(identifier)))
    }

    /// All alerts for a user, newest first
    pub fn all_for_user(&self, user_id: UserId) -> MoneyMateResult<Vec<Alert>> {
        self.storage.alerts.get_by_user(user_id)
    }

    /// Unread alerts for a user, newest first
    pub fn unread_for_user(&self, user_id: UserId) -> MoneyMateResult<Vec<Alert>> {
        let mut alerts = self.storage.alerts.get_by_user(user_id)?;
        alerts.retain(|a| !a.is_read());
        Ok(alerts)
    }

    pub fn for_budget(&self, budget_id: BudgetId) -> MoneyMateResult<Vec<Alert>> {
        let mut alerts = self.storage.alerts.get_all()?;
        alerts.retain(|a| a.budget_id == Some(budget_id));
        Ok(alerts)
    }

    pub fn for_category(&self, category_id: CategoryId) -> MoneyMateResult<Vec<Alert>> {
        let mut alerts = self.storage.alerts.get_all()?;
        alerts.retain(|a| a.category_id == Some(category_id));
        Ok(alerts)
    }

    pub fn mark_as_read(&self, id: AlertId) -> MoneyMateResult<Alert> {
        let mut alert = self
            .storage
            .alerts
            .get(id)?
            .ok_or_else(|| MoneyMateError::alert_not_found(id.to_string()))?;

        if alert.is_read() {
            return Ok(alert);
        }

        let before = alert.clone();
        alert.mark_as_read();

        self.storage.alerts.upsert(alert.clone())?;
        self.storage.alerts.save()?;

        self.storage.log_update(
            EntityType::Alert,
            alert.id.to_string(),
            None,
            &before,
            &alert,
            None,
        )?;

        Ok(alert)
    }

    /// Mark every unread alert of a user as read, returning how many changed
    pub fn mark_all_as_read(&self, user_id: UserId) -> MoneyMateResult<usize> {
        let unread = self.unread_for_user(user_id)?;
        let now = Utc::now();

        for alert in &unread {
            let mut updated = alert.clone();
            updated.read_at = Some(now);
            self.storage.alerts.upsert(updated.clone())?;
            self.storage.log_update(
                EntityType::Alert,
                updated.id.to_string(),
                None,
                alert,
                &updated,
                None,
            )?;
        }

        if !unread.is_empty() {
            self.storage.alerts.save()?;
        }

        Ok(unread.len())
    }

    pub fn delete(&self, id: AlertId) -> MoneyMateResult<()> {
        let alert = self
            .storage
            .alerts
            .get(id)?
            .ok_or_else(|| MoneyMateError::alert_not_found(id.to_string()))?;

        self.storage.alerts.delete(id)?;
        self.storage.alerts.save()?;

        self.storage
            .log_delete(EntityType::Alert, alert.id.to_string(), None, &alert)?;

        Ok(())
    }

    /// Delete every alert of a user, returning how many were removed
    pub fn delete_all_for_user(&self, user_id: UserId) -> MoneyMateResult<usize> {
        let alerts = self.storage.alerts.get_by_user(user_id)?;

        for alert in &alerts {
            self.storage.alerts.delete(alert.id)?;
            self.storage
                .log_delete(EntityType::Alert, alert.id.to_string(), None, alert)?;
        }

        if !alerts.is_empty() {
            self.storage.alerts.save()?;
        }

        Ok(alerts.len())
    }

    /// Delete every alert raised for a budget, returning how many were removed
    pub fn delete_all_for_budget(&self, budget_id: BudgetId) -> MoneyMateResult<usize> {
        let alerts = self.for_budget(budget_id)?;

        for alert in &alerts {
            self.storage.alerts.delete(alert.id)?;
            self.storage
                .log_delete(EntityType::Alert, alert.id.to_string(), None, alert)?;
        }

        if !alerts.is_empty() {
            self.storage.alerts.save()?;
        }

        Ok(alerts.len())
    }

    fn has_unread(
        &self,
        user_id: UserId,
        kind: AlertKind,
        budget_id: BudgetId,
        category_id: Option<CategoryId>,
    ) -> MoneyMateResult<bool> {
        Ok(self.storage.alerts.get_by_user(user_id)?.iter().any(|a| {
            !a.is_read()
                && a.kind == kind
                && a.budget_id == Some(budget_id)
                && a.category_id == category_id
        }))
    }

    fn insert(&self, alert: &Alert) -> MoneyMateResult<()> {
        self.storage.alerts.upsert(alert.clone())?;
        self.storage.alerts.save()?;

        self.storage.log_create(
            EntityType::Alert,
            alert.id.to_string(),
            Some(alert.message.clone()),
            alert,
        )
    }
}
