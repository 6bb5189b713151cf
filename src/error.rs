//! Crate-wide error plumbing
//!
//! Every subsystem owns an error type with a stable `CQ_*` code and a
//! severity. [`Error`] wraps them for callers that want a single type.

use std::fmt;

use thiserror::Error;

use crate::codec::CodecError;
use crate::compiler::CompileError;
use crate::executor::ExecutorError;
use crate::pager::PagerError;
use crate::registry::RegistryError;

/// Severity levels shared by all subsystem errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller request rejected; nothing else is affected
    Reject,
    /// Operation failed but the process is healthy
    Error,
    /// Configuration or consistency failure; the operation must not continue
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Any crossquery error
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Pager(#[from] PagerError),
}

impl Error {
    /// Returns the stable error code of the wrapped error
    pub fn code(&self) -> &'static str {
        match self {
            Error::Registry(e) => e.code().code(),
            Error::Compile(e) => e.code().code(),
            Error::Executor(e) => e.code().code(),
            Error::Codec(e) => e.code().code(),
            Error::Pager(e) => e.code().code(),
        }
    }

    /// Returns the severity of the wrapped error
    pub fn severity(&self) -> Severity {
        match self {
            Error::Registry(e) => e.severity(),
            Error::Compile(e) => e.severity(),
            Error::Executor(e) => e.severity(),
            Error::Codec(e) => e.severity(),
            Error::Pager(e) => e.severity(),
        }
    }
}

/// Result alias over [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
