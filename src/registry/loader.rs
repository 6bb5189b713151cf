//! Registry loader for reading field metadata from disk at startup
//!
//! Layout of a registry directory:
//! - `types/*.json`: one model type definition per file
//! - `enums.json`: optional array of enum kinds
//! - `languages.json`: optional array of language codes
//!
//! Any unreadable or malformed file fails the load.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::errors::{RegistryError, RegistryResult};
use super::registry::{FieldRegistry, RegistryBuilder};
use super::types::{EnumKind, TypeDefinition};
use crate::observability::{log_event, Event};

/// Reads a registry directory into a [`FieldRegistry`]
pub struct RegistryLoader {
    root: PathBuf,
}

impl RegistryLoader {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Directory holding one file per model type
    pub fn types_dir(&self) -> PathBuf {
        self.root.join("types")
    }

    /// Loads and validates every registry file.
    pub fn load(&self) -> RegistryResult<FieldRegistry> {
        let mut builder = FieldRegistry::builder();

        if let Some(languages) = self.read_optional::<Vec<String>>("languages.json")? {
            for language in languages {
                builder = builder.language(language);
            }
        }
        if let Some(kinds) = self.read_optional::<Vec<EnumKind>>("enums.json")? {
            for kind in kinds {
                builder = builder.enum_kind(kind);
            }
        }

        builder = self.load_types(builder)?;
        let registry = builder.build()?;

        log_event(
            Event::RegistryLoaded,
            &[
                ("root", &self.root.display().to_string()),
                ("types", &registry.len().to_string()),
            ],
        );
        Ok(registry)
    }

    fn load_types(&self, mut builder: RegistryBuilder) -> RegistryResult<RegistryBuilder> {
        let dir = self.types_dir();
        if !dir.exists() {
            return Ok(builder);
        }

        let entries = fs::read_dir(&dir).map_err(|e| {
            RegistryError::malformed(
                dir.display().to_string(),
                format!("Failed to read directory: {}", e),
            )
        })?;

        // Sorted so registration order (and duplicate detection) is stable
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                RegistryError::malformed(
                    dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let definition: TypeDefinition = read_json(&path)?;
            builder = builder.model_type(definition);
        }
        Ok(builder)
    }

    fn read_optional<T: DeserializeOwned>(&self, name: &str) -> RegistryResult<Option<T>> {
        let path = self.root.join(name);
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> RegistryResult<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        RegistryError::malformed(
            path.display().to_string(),
            format!("Failed to read file: {}", e),
        )
    })?;

    serde_json::from_str(&content).map_err(|e| {
        RegistryError::malformed(path.display().to_string(), format!("Invalid JSON: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, value: serde_json::Value) {
        if let Some(parent) = dir.join(name).parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(dir.join(name), value.to_string()).unwrap();
    }

    #[test]
    fn test_load_full_directory() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "languages.json", json!(["en", "nl"]));
        write(
            temp_dir.path(),
            "enums.json",
            json!([{ "name": "Status", "variants": [{ "name": "ACTIVE" }, { "name": "CLOSED" }] }]),
        );
        write(
            temp_dir.path(),
            "types/customer.json",
            json!({
                "name": "Customer",
                "type_code": 12,
                "entity": "CustomerEntity",
                "fields": [
                    { "id": "oid", "data_type": { "type": "identifier" } },
                    { "id": "status", "data_type": { "type": "enumeration", "kind": "Status" } },
                    { "id": "description", "data_type": { "type": "language_text" } }
                ]
            }),
        );

        let registry = RegistryLoader::new(temp_dir.path()).load().unwrap();
        let customer = registry.metadata_for(12).unwrap();
        assert_eq!(customer.entity(), "CustomerEntity");
        assert!(customer.field("description").unwrap().is_language_keyed());
        assert!(registry.is_language("nl"));
        assert!(!registry.is_language("fr"));
    }

    #[test]
    fn test_load_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let registry = RegistryLoader::new(temp_dir.path()).load().unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_malformed_file_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("types")).unwrap();
        fs::write(temp_dir.path().join("types/broken.json"), "{ not json").unwrap();

        let err = RegistryLoader::new(temp_dir.path()).load().unwrap_err();
        assert_eq!(err.code().code(), "CQ_REGISTRY_MALFORMED");
        assert!(err.message().contains("broken.json"));
    }

    #[test]
    fn test_non_json_files_ignored() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("types")).unwrap();
        fs::write(temp_dir.path().join("types/README.txt"), "notes").unwrap();

        let registry = RegistryLoader::new(temp_dir.path()).load().unwrap();
        assert!(registry.is_empty());
    }
}
