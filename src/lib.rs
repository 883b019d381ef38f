//! MoneyMate - monthly budgets, category allocations and spending alerts
//!
//! This library provides the core functionality behind the `moneymate`
//! command. Users own one budget per month, split it across global
//! categories by percentage, record expenses against those allocations and
//! get alerts when spending crosses their threshold.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (users, budgets, categories, expenses, etc.)
//! - `storage`: JSON file storage layer and login session
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `crypto`: Password hashing and strength checks
//! - `display`, `export`, `cli`: Terminal output, data export, commands
//!
//! # Example
//!
//! ```rust,ignore
//! use moneymate::config::paths::MoneyMatePaths;
//! use moneymate::services::{AuthService, BudgetService};
//! use moneymate::storage::Storage;
//!
//! let mut storage = Storage::new(MoneyMatePaths::new()?)?;
//! storage.load_all()?;
//! let user = AuthService::new(&storage).require_user()?;
//! let budgets = BudgetService::new(&storage).list_for_user(user.id)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{MoneyMateError, MoneyMateResult};
