//! Configuration module for MoneyMate
//!
//! This module provides configuration management including:
//! - Platform-aware path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::MoneyMatePaths;
pub use settings::Settings;
