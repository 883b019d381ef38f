//! YAML Export functionality
//!
//! Exports the complete database to YAML format for human-readable backup.

use std::io::Write;

use crate::error::{MoneyMateError, MoneyMateResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export the full database to YAML format
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> MoneyMateResult<()> {
    let export = FullExport::from_storage(storage)?;

    let header = format!(
        "# MoneyMate Full Database Export\n# Generated: {}\n# App Version: {}\n\n",
        export.exported_at, export.app_version
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| MoneyMateError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| MoneyMateError::Export(e.to_string()))?;

    Ok(())
}

/// Read back a YAML export
pub fn import_from_yaml(yaml_str: &str) -> MoneyMateResult<FullExport> {
    let export: FullExport =
        serde_yaml::from_str(yaml_str).map_err(|e| MoneyMateError::Export(e.to_string()))?;

    export.validate().map_err(MoneyMateError::Export)?;

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::MoneyMatePaths;
    use crate::models::{Category, User};
    use tempfile::TempDir;

    #[test]
    fn test_yaml_export() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MoneyMatePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        storage
            .users
            .upsert(User::new("Bo", "bo@example.com", "hash", 0.8))
            .unwrap();
        storage.categories.upsert(Category::new("Health")).unwrap();

        let mut buffer = Vec::new();
        export_full_yaml(&storage, &mut buffer).unwrap();
        let yaml = String::from_utf8(buffer).unwrap();

        assert!(yaml.starts_with("# MoneyMate Full Database Export"));
        assert!(yaml.contains("schema_version"));
        assert!(!yaml.contains("password_hash"));

        let imported = import_from_yaml(&yaml).unwrap();
        assert_eq!(imported.users.len(), 1);
        assert_eq!(imported.categories[0].name, "Health");
    }
}
