//! Compiler error types
//!
//! Error codes:
//! - CQ_COMPILE_UNBOUNDED_RANGE (FATAL)
//! - CQ_COMPILE_UNKNOWN_FIELD (REJECT)
//! - CQ_COMPILE_UNKNOWN_TYPE (REJECT)

use std::fmt;

use crate::error::Severity;

/// Compiler-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorCode {
    /// Range clause with neither bound set
    UnboundedRange,
    /// Clause or ordering names a field the model type lacks
    UnknownField,
    /// Model type is not in the registry
    UnknownType,
}

impl CompileErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            CompileErrorCode::UnboundedRange => "CQ_COMPILE_UNBOUNDED_RANGE",
            CompileErrorCode::UnknownField => "CQ_COMPILE_UNKNOWN_FIELD",
            CompileErrorCode::UnknownType => "CQ_COMPILE_UNKNOWN_TYPE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            CompileErrorCode::UnboundedRange => Severity::Fatal,
            CompileErrorCode::UnknownField | CompileErrorCode::UnknownType => Severity::Reject,
        }
    }
}

impl fmt::Display for CompileErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Compiler error with full context
#[derive(Debug, Clone)]
pub struct CompileError {
    code: CompileErrorCode,
    message: String,
    field: Option<String>,
}

impl CompileError {
    /// Create an unbounded range error
    pub fn unbounded_range(field: impl Into<String>) -> Self {
        let f = field.into();
        Self {
            code: CompileErrorCode::UnboundedRange,
            message: format!("Range clause on '{}' has no bound", f),
            field: Some(f),
        }
    }

    /// Create an unknown field error
    pub fn unknown_field(model_type: &str, field: impl Into<String>) -> Self {
        let f = field.into();
        Self {
            code: CompileErrorCode::UnknownField,
            message: format!("Field '{}' is not declared by '{}'", f, model_type),
            field: Some(f),
        }
    }

    /// Create an unknown model type error
    pub fn unknown_type(model_type: impl Into<String>) -> Self {
        Self {
            code: CompileErrorCode::UnknownType,
            message: format!("Model type '{}' is not registered", model_type.into()),
            field: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> CompileErrorCode {
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

    /// Returns the field name if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for CompileError {
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

impl std::error::Error for CompileError {}

/// Result type for compiler operations
pub type CompileResult<T> = Result<T, CompileError>;
