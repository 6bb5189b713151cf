//! Codec error types
//!
//! Error codes:
//! - CQ_CODEC_MISSING_TYPE_CODE (FATAL)
//! - CQ_CODEC_UNKNOWN_TYPE_CODE (FATAL)
//! - CQ_CODEC_UNSUPPORTED_SHAPE (FATAL)
//! - CQ_CODEC_INVALID_VALUE (FATAL)
//! - CQ_CODEC_UNKNOWN_FIELD (REJECT)

use std::fmt;

use crate::error::Severity;

/// Codec-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecErrorCode {
    /// Document has no type-code field
    MissingTypeCode,
    /// Type code is not registered
    UnknownTypeCode,
    /// Physical sub-fields do not form a shape the field can hold
    UnsupportedShape,
    /// Stored value cannot become the declared type
    InvalidValue,
    /// Encoding a field the model type does not declare
    UnknownField,
}

impl CodecErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            CodecErrorCode::MissingTypeCode => "CQ_CODEC_MISSING_TYPE_CODE",
            CodecErrorCode::UnknownTypeCode => "CQ_CODEC_UNKNOWN_TYPE_CODE",
            CodecErrorCode::UnsupportedShape => "CQ_CODEC_UNSUPPORTED_SHAPE",
            CodecErrorCode::InvalidValue => "CQ_CODEC_INVALID_VALUE",
            CodecErrorCode::UnknownField => "CQ_CODEC_UNKNOWN_FIELD",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            CodecErrorCode::UnknownField => Severity::Reject,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for CodecErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Codec error with full context
#[derive(Debug, Clone)]
pub struct CodecError {
    code: CodecErrorCode,
    message: String,
    field: Option<String>,
}

impl CodecError {
    /// Create a missing type code error
    pub fn missing_type_code(reserved: &str) -> Self {
        Self {
            code: CodecErrorCode::MissingTypeCode,
            message: format!("Document has no '{}' field", reserved),
            field: None,
        }
    }

    /// Create an unknown type code error
    pub fn unknown_type_code(code: impl fmt::Display) -> Self {
        Self {
            code: CodecErrorCode::UnknownTypeCode,
            message: format!("Type code '{}' is not registered", code),
            field: None,
        }
    }

    /// Create an unknown model type error, for encoding by type name
    pub fn unknown_type(model_type: &str) -> Self {
        Self {
            code: CodecErrorCode::UnknownTypeCode,
            message: format!("Model type '{}' is not registered", model_type),
            field: None,
        }
    }

    /// Create an unsupported shape error
    pub fn unsupported_shape(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let f = field.into();
        Self {
            code: CodecErrorCode::UnsupportedShape,
            message: format!("Field '{}': {}", f, reason.into()),
            field: Some(f),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let f = field.into();
        Self {
            code: CodecErrorCode::InvalidValue,
            message: format!("Field '{}': {}", f, reason.into()),
            field: Some(f),
        }
    }

    /// Create an unknown field error
    pub fn unknown_field(model_type: &str, field: impl Into<String>) -> Self {
        let f = field.into();
        Self {
            code: CodecErrorCode::UnknownField,
            message: format!("Field '{}' is not declared by '{}'", f, model_type),
            field: Some(f),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> CodecErrorCode {
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

impl fmt::Display for CodecError {
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

impl std::error::Error for CodecError {}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_failures_are_fatal() {
        assert_eq!(CodecErrorCode::UnsupportedShape.severity(), Severity::Fatal);
        assert_eq!(CodecErrorCode::UnknownTypeCode.severity(), Severity::Fatal);
        assert_eq!(CodecErrorCode::UnknownField.severity(), Severity::Reject);
    }

    #[test]
    fn test_error_display() {
        let err = CodecError::unsupported_shape("period", "expected lower and upper");
        assert_eq!(err.field(), Some("period"));
        assert!(err.to_string().starts_with("[FATAL] CQ_CODEC_UNSUPPORTED_SHAPE"));
    }
}
