//! crossquery - one filter model over a relational store and an inverted index
//!
//! - `compiler`: filter tree to parameterized WHERE / ORDER BY
//! - `executor`: count-then-page execution against a relational backend
//! - `codec`: typed values out of (and into) stored index documents
//! - `pager`: exactly-once collection of every index hit
//! - `registry`: field metadata shared by all of the above

pub mod cli;
pub mod codec;
pub mod compiler;
pub mod error;
pub mod executor;
pub mod filter;
pub mod observability;
pub mod pager;
pub mod registry;

pub use error::{Error, Result, Severity};
