//! Result pager for crossquery
//!
//! Collects every hit of an index query through the index's native paged
//! search, visiting each matching document exactly once. The walk assumes
//! the index snapshot stays the same for its whole duration and fails if
//! it does not.

mod errors;
mod pager;

pub use errors::{PagerError, PagerErrorCode, PagerResult};
pub use pager::{IndexSearcher, ResultPager, SearchWindow};
