//! Query Executor subsystem for crossquery
//!
//! Runs filters against the relational backend with a count-then-page
//! protocol and hands back lazily transformed pages.
//!
//! # Page flow (strict order)
//!
//! 1. Clear the backend cache
//! 2. Compile the filter for the connection's full-text capability, and the
//!    ordering
//! 3. Count matching rows; zero returns an empty page without fetching
//! 4. Fetch the requested window, ordered with the tie-break field last
//! 5. Fail loudly if the window is empty after a nonzero count

mod backend;
mod errors;
mod executor;
mod result;

pub use backend::{Connection, RelationalBackend, Statement};
pub use errors::{ExecutorError, ExecutorErrorCode, ExecutorResult};
pub use executor::QueryExecutor;
pub use result::PagedResults;
