//! Predicate compiler for crossquery
//!
//! Compiles a filter tree over one model type into a parameterized
//! relational WHERE predicate and ORDER BY clause:
//! - Leaf clauses become parenthesized `<alias>.<column>` terms
//! - Values are bound as named parameters, except text filters which are
//!   sanitized and inlined
//! - Orderings always end with the tie-break field
//!
//! Compilation is deterministic: the same filter, model type and options
//! always produce the same predicate and parameter plan.

mod compiler;
mod dialect;
mod errors;
mod explain;
mod ordering;
mod sanitize;

pub use compiler::{
    BoundValue, CompiledPredicate, CompilerOptions, ParameterBinding, ParameterPlan,
    PredicateCompiler, MATCH_ALL,
};
pub use dialect::{Dialect, FullTextCapability};
pub use errors::{CompileError, CompileErrorCode, CompileResult};
pub use explain::ExplainPlan;
pub use ordering::{SortDirection, SortSpec};
pub use sanitize::{sanitize_text, SQL_KEYWORDS};
