//! Registry error types
//!
//! Error codes:
//! - CQ_REGISTRY_MALFORMED (FATAL)
//! - CQ_REGISTRY_DUPLICATE_TYPE (FATAL)
//! - CQ_REGISTRY_DUPLICATE_FIELD (FATAL)
//! - CQ_REGISTRY_INVALID_FIELD (FATAL)
//! - CQ_REGISTRY_UNKNOWN_ENUM (FATAL)
//! - CQ_REGISTRY_UNRESOLVED_POLYMORPHIC (FATAL)
//! - CQ_REGISTRY_INVALID_LANGUAGE (FATAL)
//!
//! The registry is built once at startup, so every failure is a
//! configuration error and fatal.

use std::fmt;

use crate::error::Severity;

/// Registry-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryErrorCode {
    /// Registry file unreadable or not valid JSON
    Malformed,
    /// Two model types share a type code or a name
    DuplicateType,
    /// A model type declares the same field twice
    DuplicateField,
    /// Field flags contradict each other or the declared data type
    InvalidField,
    /// Enumeration field names an enum kind the registry lacks
    UnknownEnum,
    /// Polymorphic field has no concrete type in its model type
    UnresolvedPolymorphic,
    /// Language code is not well formed
    InvalidLanguage,
}

impl RegistryErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            RegistryErrorCode::Malformed => "CQ_REGISTRY_MALFORMED",
            RegistryErrorCode::DuplicateType => "CQ_REGISTRY_DUPLICATE_TYPE",
            RegistryErrorCode::DuplicateField => "CQ_REGISTRY_DUPLICATE_FIELD",
            RegistryErrorCode::InvalidField => "CQ_REGISTRY_INVALID_FIELD",
            RegistryErrorCode::UnknownEnum => "CQ_REGISTRY_UNKNOWN_ENUM",
            RegistryErrorCode::UnresolvedPolymorphic => "CQ_REGISTRY_UNRESOLVED_POLYMORPHIC",
            RegistryErrorCode::InvalidLanguage => "CQ_REGISTRY_INVALID_LANGUAGE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for RegistryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Registry error with context
#[derive(Debug, Clone)]
pub struct RegistryError {
    code: RegistryErrorCode,
    message: String,
    /// Model type the error was found in, if any
    model_type: Option<String>,
}

impl RegistryError {
    fn new(code: RegistryErrorCode, message: String, model_type: Option<String>) -> Self {
        Self {
            code,
            message,
            model_type,
        }
    }

    /// Create a malformed registry file error
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            RegistryErrorCode::Malformed,
            format!("Registry file '{}' is malformed: {}", path.into(), reason.into()),
            None,
        )
    }

    /// Create a duplicate type code error
    pub fn duplicate_type_code(type_code: u32, model_type: impl Into<String>) -> Self {
        let name = model_type.into();
        Self::new(
            RegistryErrorCode::DuplicateType,
            format!("Type code {} is already registered (while adding '{}')", type_code, name),
            Some(name),
        )
    }

    /// Create a duplicate type name error
    pub fn duplicate_type_name(model_type: impl Into<String>) -> Self {
        let name = model_type.into();
        Self::new(
            RegistryErrorCode::DuplicateType,
            format!("Model type '{}' is already registered", name),
            Some(name),
        )
    }

    /// Create a duplicate field error
    pub fn duplicate_field(model_type: impl Into<String>, field: impl Into<String>) -> Self {
        let name = model_type.into();
        Self::new(
            RegistryErrorCode::DuplicateField,
            format!("Field '{}' declared twice in '{}'", field.into(), name),
            Some(name),
        )
    }

    /// Create an invalid field error
    pub fn invalid_field(
        model_type: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        let name = model_type.into();
        Self::new(
            RegistryErrorCode::InvalidField,
            format!("Field '{}' in '{}': {}", field.into(), name, reason.into()),
            Some(name),
        )
    }

    /// Create an unknown enum kind error
    pub fn unknown_enum(model_type: impl Into<String>, kind: impl Into<String>) -> Self {
        let name = model_type.into();
        Self::new(
            RegistryErrorCode::UnknownEnum,
            format!("Enum kind '{}' used by '{}' is not registered", kind.into(), name),
            Some(name),
        )
    }

    /// Create an unresolved polymorphic field error
    pub fn unresolved_polymorphic(model_type: impl Into<String>, field: impl Into<String>) -> Self {
        let name = model_type.into();
        Self::new(
            RegistryErrorCode::UnresolvedPolymorphic,
            format!(
                "Polymorphic field '{}' has no concrete type in '{}'",
                field.into(),
                name
            ),
            Some(name),
        )
    }

    /// Create an invalid language code error
    pub fn invalid_language(code: impl Into<String>) -> Self {
        Self::new(
            RegistryErrorCode::InvalidLanguage,
            format!("'{}' is not a valid language code", code.into()),
            None,
        )
    }

    /// Returns the error code
    pub fn code(&self) -> RegistryErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the model type the error concerns
    pub fn model_type(&self) -> Option<&str> {
        self.model_type.as_deref()
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for RegistryError {}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
