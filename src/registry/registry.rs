//! Field metadata registry
//!
//! Built once at startup through [`RegistryBuilder`] and read-only after
//! that. Callers hold it by shared reference; nothing in the registry is
//! lazily computed.

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use regex::Regex;

use super::errors::{RegistryError, RegistryResult};
use super::types::{EnumKind, TypeDefinition, TypeMetadata};

/// Languages accepted when a registry declares none
pub const DEFAULT_LANGUAGES: &[&str] = &["en", "fr", "de", "es", "it", "nl", "pt", "ja", "zh"];

fn language_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Literal pattern, cannot fail to compile
    PATTERN.get_or_init(|| Regex::new(r"^[a-z]{2,3}(_[A-Z]{2})?$").unwrap())
}

/// Returns true if `code` is shaped like a language code (`en`, `pt_BR`)
pub fn is_well_formed_language(code: &str) -> bool {
    language_pattern().is_match(code)
}

/// Immutable catalog of model types, enum kinds and languages
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    types: Vec<TypeMetadata>,
    by_code: HashMap<u32, usize>,
    by_name: HashMap<String, usize>,
    enums: HashMap<String, EnumKind>,
    languages: BTreeSet<String>,
}

impl FieldRegistry {
    /// Starts an empty builder
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Metadata of the model type stored under `type_code`
    pub fn metadata_for(&self, type_code: u32) -> Option<&TypeMetadata> {
        self.by_code.get(&type_code).map(|&pos| &self.types[pos])
    }

    /// Metadata of the model type called `name`
    pub fn type_named(&self, name: &str) -> Option<&TypeMetadata> {
        self.by_name.get(name).map(|&pos| &self.types[pos])
    }

    pub fn enum_kind(&self, name: &str) -> Option<&EnumKind> {
        self.enums.get(name)
    }

    /// Returns true if `code` is one of the registry's languages
    pub fn is_language(&self, code: &str) -> bool {
        self.languages.contains(code)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(String::as_str)
    }

    /// All model types in registration order
    pub fn types(&self) -> &[TypeMetadata] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Collects definitions and validates them into a [`FieldRegistry`]
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    definitions: Vec<TypeDefinition>,
    enums: Vec<EnumKind>,
    languages: Vec<String>,
}

impl RegistryBuilder {
    /// Adds a model type
    pub fn model_type(mut self, definition: TypeDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Adds an enumeration kind
    pub fn enum_kind(mut self, kind: EnumKind) -> Self {
        self.enums.push(kind);
        self
    }

    /// Adds a language code. Without any, [`DEFAULT_LANGUAGES`] apply.
    pub fn language(mut self, code: impl Into<String>) -> Self {
        self.languages.push(code.into());
        self
    }

    /// Validates everything and freezes the registry
    pub fn build(self) -> RegistryResult<FieldRegistry> {
        let languages: BTreeSet<String> = if self.languages.is_empty() {
            DEFAULT_LANGUAGES.iter().map(|l| (*l).to_string()).collect()
        } else {
            self.languages.into_iter().collect()
        };
        if let Some(bad) = languages.iter().find(|l| !is_well_formed_language(l)) {
            return Err(RegistryError::invalid_language(bad.as_str()));
        }

        let mut enums = HashMap::with_capacity(self.enums.len());
        for kind in self.enums {
            kind.validate()?;
            enums.insert(kind.name.clone(), kind);
        }

        let mut types = Vec::with_capacity(self.definitions.len());
        let mut by_code = HashMap::new();
        let mut by_name = HashMap::new();

        for definition in self.definitions {
            let meta = TypeMetadata::from_definition(definition)?;

            if let Some(kind) = meta.enum_kinds().find(|k| !enums.contains_key(*k)) {
                return Err(RegistryError::unknown_enum(meta.name(), kind));
            }
            if by_code.contains_key(&meta.type_code()) {
                return Err(RegistryError::duplicate_type_code(meta.type_code(), meta.name()));
            }
            if by_name.contains_key(meta.name()) {
                return Err(RegistryError::duplicate_type_name(meta.name()));
            }

            by_code.insert(meta.type_code(), types.len());
            by_name.insert(meta.name().to_string(), types.len());
            types.push(meta);
        }

        Ok(FieldRegistry {
            types,
            by_code,
            by_name,
            enums,
            languages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::types::{DataType, FieldMetadata};

    fn customer() -> TypeDefinition {
        TypeDefinition::new("Customer", 1)
            .with_field(FieldMetadata::scalar("oid", DataType::Identifier))
            .with_field(FieldMetadata::scalar(
                "status",
                DataType::Enumeration {
                    kind: "Status".into(),
                },
            ))
    }

    #[test]
    fn test_lookup_by_code_and_name() {
        let registry = FieldRegistry::builder()
            .enum_kind(EnumKind::named("Status", &["ACTIVE", "CLOSED"]))
            .model_type(customer())
            .build()
            .unwrap();

        assert_eq!(registry.metadata_for(1).unwrap().name(), "Customer");
        assert!(registry.metadata_for(2).is_none());
        assert_eq!(registry.type_named("Customer").unwrap().type_code(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_default_languages() {
        let registry = FieldRegistry::builder().build().unwrap();
        assert!(registry.is_language("en"));
        assert!(registry.is_language("fr"));
        assert!(!registry.is_language("lower"));
    }

    #[test]
    fn test_declared_languages_replace_defaults() {
        let registry = FieldRegistry::builder()
            .language("en")
            .language("pt_BR")
            .build()
            .unwrap();
        assert!(registry.is_language("pt_BR"));
        assert!(!registry.is_language("fr"));
    }

    #[test]
    fn test_malformed_language_rejected() {
        let err = FieldRegistry::builder().language("English").build().unwrap_err();
        assert_eq!(err.code().code(), "CQ_REGISTRY_INVALID_LANGUAGE");
    }

    #[test]
    fn test_unknown_enum_rejected() {
        let err = FieldRegistry::builder()
            .model_type(customer())
            .build()
            .unwrap_err();
        assert_eq!(err.code().code(), "CQ_REGISTRY_UNKNOWN_ENUM");
    }

    #[test]
    fn test_duplicate_type_code_rejected() {
        let err = FieldRegistry::builder()
            .enum_kind(EnumKind::named("Status", &["ACTIVE"]))
            .model_type(customer())
            .model_type(TypeDefinition::new("Supplier", 1))
            .build()
            .unwrap_err();
        assert_eq!(err.code().code(), "CQ_REGISTRY_DUPLICATE_TYPE");
    }
}
