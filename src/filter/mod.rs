//! Filter Model
//!
//! The boolean clause tree a caller builds per request. The core never
//! mutates a filter; compilation borrows it.

mod ast;

pub use ast::{Filter, Occur, QualifiedClause, QueryClause, RangeBound, TextMatch, Value};
