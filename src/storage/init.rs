//! Storage initialization
//!
//! Handles first-run setup and the starter category set

use crate::config::paths::MoneyMatePaths;
use crate::error::MoneyMateError;
use crate::models::Category;

use super::categories::CategoryData;
use super::file_io::write_json_atomic;

/// Categories created on first run
const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Food", "#EB9362"),
    ("Transport", "#9DBAD5"),
    ("Leisure", "#6CC57C"),
    ("Housing", "#A2C3FD"),
    ("Health", "#CAFEBF"),
    ("Shopping", "#FFC7FC"),
];

/// Initialize storage for a fresh installation
///
/// Creates the data directory and seeds the starter categories. Existing
/// data is left untouched.
pub fn initialize_storage(paths: &MoneyMatePaths) -> Result<(), MoneyMateError> {
    paths.ensure_directories()?;

    if needs_initialization(paths) {
        create_default_categories(paths)?;
    }

    Ok(())
}

fn create_default_categories(paths: &MoneyMatePaths) -> Result<(), MoneyMateError> {
    let categories = DEFAULT_CATEGORIES
        .iter()
        .map(|(name, color)| Category::with_color(*name, *color))
        .collect();

    write_json_atomic(paths.categories_file(), &CategoryData { categories })
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &MoneyMatePaths) -> bool {
    !paths.categories_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MoneyMatePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));
        initialize_storage(&paths).unwrap();

        assert!(!needs_initialization(&paths));
        assert!(paths.data_dir().exists());

        let content = std::fs::read_to_string(paths.categories_file()).unwrap();
        let data: CategoryData = serde_json::from_str(&content).unwrap();
        assert_eq!(data.categories.len(), DEFAULT_CATEGORIES.len());
        assert!(data.categories.iter().all(|c| c.validate().is_ok()));
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MoneyMatePaths::with_base_dir(temp_dir.path().to_path_buf());

        initialize_storage(&paths).unwrap();
        let custom = CategoryData {
            categories: vec![Category::new("Custom")],
        };
        write_json_atomic(paths.categories_file(), &custom).unwrap();

        initialize_storage(&paths).unwrap();

        let content = std::fs::read_to_string(paths.categories_file()).unwrap();
        let data: CategoryData = serde_json::from_str(&content).unwrap();
        assert_eq!(data.categories.len(), 1);
        assert_eq!(data.categories[0].name, "Custom");
    }
}
