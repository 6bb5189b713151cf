//! Observable events for crossquery
//!
//! Events are explicit and typed. Each event carries a default severity so
//! call sites only attach the fields.

use std::fmt;

use super::logger::Severity;

/// Observable events emitted by the compiler, executor, codec and pager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Startup
    /// Configuration loaded
    ConfigLoaded,
    /// Field metadata registry loaded
    RegistryLoaded,

    // Predicate compilation
    /// Filter root had no clauses; every row matches
    FilterEmpty,
    /// Clause skipped because its field is not stored relationally
    ClauseDropped,
    /// Exclusive range bound compiled as inclusive
    RangeBoundWidened,
    /// Text filter reduced to nothing by sanitization
    TextFilterEmpty,
    /// Full-text capability probe failed
    FullTextProbeFailed,

    // Relational execution
    /// Count query issued
    QueryCount,
    /// Page query issued
    QueryPage,
    /// Count reported rows but the page came back empty
    PageConsistencyViolation,

    // Index materialization
    /// Stored field has no metadata in the document's model type
    DocumentFieldSkipped,
    /// One window of index hits fetched
    IndexWindowFetched,
}

impl Event {
    /// Returns the event name written to the log line
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::RegistryLoaded => "REGISTRY_LOADED",
            Event::FilterEmpty => "FILTER_EMPTY",
            Event::ClauseDropped => "CLAUSE_DROPPED",
            Event::RangeBoundWidened => "RANGE_BOUND_WIDENED",
            Event::TextFilterEmpty => "TEXT_FILTER_EMPTY",
            Event::FullTextProbeFailed => "FULLTEXT_PROBE_FAILED",
            Event::QueryCount => "QUERY_COUNT",
            Event::QueryPage => "QUERY_PAGE",
            Event::PageConsistencyViolation => "PAGE_CONSISTENCY_VIOLATION",
            Event::DocumentFieldSkipped => "DOCUMENT_FIELD_SKIPPED",
            Event::IndexWindowFetched => "INDEX_WINDOW_FETCHED",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigLoaded | Event::RegistryLoaded => Severity::Info,
            Event::FilterEmpty
            | Event::RangeBoundWidened
            | Event::TextFilterEmpty
            | Event::FullTextProbeFailed => Severity::Warn,
            Event::PageConsistencyViolation => Severity::Error,
            Event::ClauseDropped
            | Event::QueryCount
            | Event::QueryPage
            | Event::DocumentFieldSkipped
            | Event::IndexWindowFetched => Severity::Trace,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
