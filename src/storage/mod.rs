//! Storage layer for MoneyMate
//!
//! One JSON file per table under `<base>/data/`, loaded into memory and
//! written back with atomic replacement. Every mutation made through the
//! services is also recorded in the audit log via the `log_*` helpers.

pub mod alerts;
pub mod budget;
pub mod budget_categories;
pub mod categories;
pub mod expenses;
pub mod file_io;
pub mod init;
pub mod session;
pub mod users;

pub use alerts::AlertRepository;
pub use budget::BudgetRepository;
pub use budget_categories::BudgetCategoryRepository;
pub use categories::CategoryRepository;
pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use session::{Session, SessionStore};
pub use users::UserRepository;

use serde::Serialize;

use crate::audit::{generate_diff, snapshot, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::MoneyMatePaths;
use crate::config::settings::Settings;
use crate::error::MoneyMateError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: MoneyMatePaths,
    settings: Settings,
    audit: AuditLogger,
    pub session: SessionStore,
    pub users: UserRepository,
    pub budgets: BudgetRepository,
    pub categories: CategoryRepository,
    pub budget_categories: BudgetCategoryRepository,
    pub expenses: ExpenseRepository,
    pub alerts: AlertRepository,
}

impl Storage {
    /// Create a new Storage instance, reading settings from `config.json`
    pub fn new(paths: MoneyMatePaths) -> Result<Self, MoneyMateError> {
        paths.ensure_directories()?;
        let settings = Settings::load_or_create(&paths)?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            session: SessionStore::new(paths.clone()),
            users: UserRepository::new(paths.users_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            budget_categories: BudgetCategoryRepository::new(paths.budget_categories_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            alerts: AlertRepository::new(paths.alerts_file()),
            settings,
            paths,
        })
    }

    pub fn paths(&self) -> &MoneyMatePaths {
        &self.paths
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), MoneyMateError> {
        self.users.load()?;
        self.budgets.load()?;
        self.categories.load()?;
        self.budget_categories.load()?;
        self.expenses.load()?;
        self.alerts.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), MoneyMateError> {
        self.users.save()?;
        self.budgets.save()?;
        self.categories.save()?;
        self.budget_categories.save()?;
        self.expenses.save()?;
        self.alerts.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), MoneyMateError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record an update; the diff is computed from the snapshots when not given
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Result<(), MoneyMateError> {
        let diff_summary = diff_summary.or_else(|| match (snapshot(before), snapshot(after)) {
            (Some(b), Some(a)) => generate_diff(&b, &a),
            _ => None,
        });

        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), MoneyMateError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::Category;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MoneyMatePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
        assert_eq!(storage.settings().default_allocation_percentage, 10.0);
    }

    #[test]
    fn test_save_all_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MoneyMatePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();
        storage.categories.upsert(Category::new("Food")).unwrap();
        storage.save_all().unwrap();

        let mut reloaded = Storage::new(paths).unwrap();
        reloaded.load_all().unwrap();
        assert_eq!(reloaded.categories.count().unwrap(), 1);
        assert_eq!(reloaded.users.count().unwrap(), 0);
    }

    #[test]
    fn test_log_update_computes_diff() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MoneyMatePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        let before = Category::new("Food");
        let mut after = before.clone();
        after.name = "Groceries".into();
        storage
            .log_update(
                EntityType::Category,
                after.id.to_string(),
                Some(after.name.clone()),
                &before,
                &after,
                None,
            )
            .unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Update);
        assert_eq!(
            entries[0].diff_summary.as_deref(),
            Some("name: \"Food\" -> \"Groceries\"")
        );
    }
}
