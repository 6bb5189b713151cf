//! Relational backend seam
//!
//! The executor never talks to a database driver directly. It issues
//! [`Statement`]s through a [`RelationalBackend`] owned by a
//! [`Connection`], which also remembers whether full-text predicates are
//! available on that handle.

use std::fmt;

use crate::compiler::{CompiledPredicate, FullTextCapability, ParameterPlan};
use crate::observability::{log_event, Event};

/// A complete query and the parameters it references
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: ParameterPlan,
}

impl Statement {
    /// `SELECT COUNT(<alias>) FROM <entity> <alias> WHERE (...)`
    pub fn count(entity: &str, alias: &str, predicate: &CompiledPredicate) -> Self {
        Self {
            sql: format!(
                "SELECT COUNT({alias}) FROM {entity} {alias} {}",
                predicate.where_clause()
            ),
            params: predicate.parameters.clone(),
        }
    }

    /// `SELECT <alias> FROM <entity> <alias> WHERE (...) ORDER BY ...`
    pub fn page(entity: &str, alias: &str, predicate: &CompiledPredicate, order_by: &str) -> Self {
        Self {
            sql: format!(
                "SELECT {alias} FROM {entity} {alias} {} ORDER BY {}",
                predicate.where_clause(),
                order_by
            ),
            params: predicate.parameters.clone(),
        }
    }
}

/// Relational persistence handle
pub trait RelationalBackend {
    /// One fetched entity
    type Row;
    /// Driver error, reported through its message
    type Error: fmt::Display;

    /// Drops any cached entities so queries see current rows
    fn clear_cache(&mut self);

    /// Returns true if vendor full-text predicates run on this handle
    fn probe_full_text(&mut self) -> Result<bool, Self::Error>;

    /// Runs a count statement
    fn count(&mut self, statement: &Statement) -> Result<u64, Self::Error>;

    /// Fetches at most `page_size` rows starting at zero-based `first_row`
    fn fetch(
        &mut self,
        statement: &Statement,
        first_row: u64,
        page_size: usize,
    ) -> Result<Vec<Self::Row>, Self::Error>;
}

/// A backend handle with its memoized full-text capability
pub struct Connection<B: RelationalBackend> {
    backend: B,
    full_text: Option<FullTextCapability>,
}

impl<B: RelationalBackend> Connection<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            full_text: None,
        }
    }

    /// Full-text capability of this handle, probed on first use.
    ///
    /// A failing probe is logged and counts as unsupported.
    pub fn full_text(&mut self) -> FullTextCapability {
        if let Some(capability) = self.full_text {
            return capability;
        }

        let capability = match self.backend.probe_full_text() {
            Ok(supported) => FullTextCapability::from_probe(supported),
            Err(err) => {
                let reason = err.to_string();
                log_event(Event::FullTextProbeFailed, &[("reason", reason.as_str())]);
                FullTextCapability::Unsupported
            }
        };
        self.full_text = Some(capability);
        capability
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_inner(self) -> B {
        self.backend
    }
}
