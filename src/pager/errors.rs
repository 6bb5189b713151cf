//! Pager error types
//!
//! Error codes:
//! - CQ_PAGER_INVALID_PAGE_SIZE (REJECT)
//! - CQ_PAGER_BACKEND_FAILED (ERROR)
//! - CQ_PAGER_EMPTY_WINDOW (FATAL)
//! - CQ_PAGER_SNAPSHOT_CHANGED (FATAL)

use std::fmt;

use crate::error::Severity;

/// Pager-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerErrorCode {
    InvalidPageSize,
    BackendFailed,
    /// Window came back empty before the reported total was reached
    EmptyWindow,
    /// Index snapshot changed between windows of one walk
    SnapshotChanged,
}

impl PagerErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            PagerErrorCode::InvalidPageSize => "CQ_PAGER_INVALID_PAGE_SIZE",
            PagerErrorCode::BackendFailed => "CQ_PAGER_BACKEND_FAILED",
            PagerErrorCode::EmptyWindow => "CQ_PAGER_EMPTY_WINDOW",
            PagerErrorCode::SnapshotChanged => "CQ_PAGER_SNAPSHOT_CHANGED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            PagerErrorCode::InvalidPageSize => Severity::Reject,
            PagerErrorCode::BackendFailed => Severity::Error,
            PagerErrorCode::EmptyWindow | PagerErrorCode::SnapshotChanged => Severity::Fatal,
        }
    }
}

impl fmt::Display for PagerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Pager error with full context
#[derive(Debug, Clone)]
pub struct PagerError {
    code: PagerErrorCode,
    message: String,
    /// Offset the walk had reached
    offset: Option<u64>,
}

impl PagerError {
    pub fn invalid_page_size() -> Self {
        Self {
            code: PagerErrorCode::InvalidPageSize,
            message: "Page size must be greater than zero".to_string(),
            offset: None,
        }
    }

    pub fn backend_failed(offset: u64, reason: impl fmt::Display) -> Self {
        Self {
            code: PagerErrorCode::BackendFailed,
            message: format!("Index search at offset {} failed: {}", offset, reason),
            offset: Some(offset),
        }
    }

    /// Create an empty window error (FATAL)
    pub fn empty_window(offset: u64, total: u64) -> Self {
        Self {
            code: PagerErrorCode::EmptyWindow,
            message: format!(
                "Index returned no hits at offset {} of {} reported",
                offset, total
            ),
            offset: Some(offset),
        }
    }

    /// Create a snapshot changed error (FATAL)
    pub fn snapshot_changed(offset: u64, expected: u64, found: u64) -> Self {
        Self {
            code: PagerErrorCode::SnapshotChanged,
            message: format!(
                "Index generation moved from {} to {} at offset {}",
                expected, found, offset
            ),
            offset: Some(offset),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> PagerErrorCode {
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

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }
}

impl fmt::Display for PagerError {
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

impl std::error::Error for PagerError {}

/// Result type for pager operations
pub type PagerResult<T> = Result<T, PagerError>;
