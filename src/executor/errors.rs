//! Executor error types
//!
//! Error codes:
//! - CQ_EXECUTOR_INVALID_PAGE_SIZE (REJECT)
//! - CQ_BACKEND_FAILED (ERROR)
//! - CQ_EXECUTOR_PAGE_INCONSISTENT (FATAL)

use std::fmt;

use crate::error::Severity;

/// Executor-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorErrorCode {
    /// Page size of zero
    InvalidPageSize,
    /// Relational backend call failed
    BackendFailed,
    /// Count reported rows but the page fetch returned none
    PageInconsistent,
}

impl ExecutorErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorErrorCode::InvalidPageSize => "CQ_EXECUTOR_INVALID_PAGE_SIZE",
            ExecutorErrorCode::BackendFailed => "CQ_BACKEND_FAILED",
            ExecutorErrorCode::PageInconsistent => "CQ_EXECUTOR_PAGE_INCONSISTENT",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            ExecutorErrorCode::InvalidPageSize => Severity::Reject,
            ExecutorErrorCode::BackendFailed => Severity::Error,
            ExecutorErrorCode::PageInconsistent => Severity::Fatal,
        }
    }
}

impl fmt::Display for ExecutorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Executor error type with full context
#[derive(Debug)]
pub struct ExecutorError {
    code: ExecutorErrorCode,
    message: String,
    /// Model type the query ran against, if known
    model_type: Option<String>,
}

impl ExecutorError {
    /// Create an invalid page size error
    pub fn invalid_page_size() -> Self {
        Self {
            code: ExecutorErrorCode::InvalidPageSize,
            message: "Page size must be greater than zero".to_string(),
            model_type: None,
        }
    }

    /// Create a backend failure error
    pub fn backend_failed(operation: &str, reason: impl fmt::Display) -> Self {
        Self {
            code: ExecutorErrorCode::BackendFailed,
            message: format!("Backend {} failed: {}", operation, reason),
            model_type: None,
        }
    }

    /// Create a page consistency error (FATAL)
    pub fn page_inconsistent(model_type: &str, total: u64, first_row: u64) -> Self {
        Self {
            code: ExecutorErrorCode::PageInconsistent,
            message: format!(
                "Count reported {} rows for '{}' but the page at row {} was empty",
                total, model_type, first_row
            ),
            model_type: Some(model_type.to_string()),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ExecutorErrorCode {
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

    /// Returns the model type if applicable
    pub fn model_type(&self) -> Option<&str> {
        self.model_type.as_deref()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for ExecutorError {
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

impl std::error::Error for ExecutorError {}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;
