//! Query executor for crossquery
//!
//! Runs compiled filters against a relational backend using the
//! count-then-page protocol.
//!
//! Page flow (strict order):
//! 1. Reject a zero page size
//! 2. Clear the backend cache
//! 3. Compile the filter with the connection's full-text capability,
//!    and the ordering
//! 4. Count; a zero count returns an empty page without fetching
//! 5. Fetch the page window in filter order plus tie-break
//! 6. An empty window after a nonzero count is a consistency failure
//! 7. Hand back the rows, transformed lazily

use std::iter::Map;
use std::vec;

use crate::compiler::{CompileError, CompiledPredicate, CompilerOptions, PredicateCompiler, SortSpec};
use crate::error::Result;
use crate::filter::Filter;
use crate::observability::{log_event, Event};
use crate::registry::{FieldRegistry, TypeMetadata};

use super::backend::{Connection, RelationalBackend, Statement};
use super::errors::ExecutorError;
use super::result::PagedResults;

/// Executes filters over one connection
pub struct QueryExecutor<'a, B: RelationalBackend> {
    registry: &'a FieldRegistry,
    options: &'a CompilerOptions,
    connection: &'a mut Connection<B>,
}

impl<'a, B: RelationalBackend> QueryExecutor<'a, B> {
    /// Creates a new executor
    pub fn new(
        registry: &'a FieldRegistry,
        options: &'a CompilerOptions,
        connection: &'a mut Connection<B>,
    ) -> Self {
        Self {
            registry,
            options,
            connection,
        }
    }

    /// Counts rows of `model_type` matching `filter`
    pub fn count(&mut self, model_type: &str, filter: &Filter) -> Result<u64> {
        self.connection.backend_mut().clear_cache();
        let model = self.model(model_type)?;
        let predicate = self.compile(model, filter)?;
        self.run_count(model, &predicate)
    }

    /// Fetches one page of raw rows
    pub fn page(
        &mut self,
        model_type: &str,
        filter: &Filter,
        orderings: &[SortSpec],
        first_row: u64,
        page_size: usize,
    ) -> Result<PagedResults<vec::IntoIter<B::Row>>> {
        let (total, rows) = self.fetch_page(model_type, filter, orderings, first_row, page_size)?;
        Ok(PagedResults::new(total, first_row, page_size, rows.into_iter()))
    }

    /// Fetches one page, turning each row into an item with `transform`
    /// as the page is iterated.
    pub fn page_with<T, F>(
        &mut self,
        model_type: &str,
        filter: &Filter,
        orderings: &[SortSpec],
        first_row: u64,
        page_size: usize,
        transform: F,
    ) -> Result<PagedResults<Map<vec::IntoIter<B::Row>, F>>>
    where
        F: FnMut(B::Row) -> T,
    {
        let (total, rows) = self.fetch_page(model_type, filter, orderings, first_row, page_size)?;
        Ok(PagedResults::new(
            total,
            first_row,
            page_size,
            rows.into_iter().map(transform),
        ))
    }

    /// Count then fetch; returns the total and the window's rows
    fn fetch_page(
        &mut self,
        model_type: &str,
        filter: &Filter,
        orderings: &[SortSpec],
        first_row: u64,
        page_size: usize,
    ) -> Result<(u64, Vec<B::Row>)> {
        if page_size == 0 {
            return Err(ExecutorError::invalid_page_size().into());
        }

        self.connection.backend_mut().clear_cache();
        let model = self.model(model_type)?;
        let predicate = self.compile(model, filter)?;
        let order_by = self.compiler(model).compile_ordering(orderings)?;

        let total = self.run_count(model, &predicate)?;
        if total == 0 {
            return Ok((0, Vec::new()));
        }

        let statement = Statement::page(
            model.entity(),
            &self.options.entity_alias,
            &predicate,
            &order_by,
        );
        let first_row_str = first_row.to_string();
        let page_size_str = page_size.to_string();
        log_event(
            Event::QueryPage,
            &[
                ("type", model.name()),
                ("first_row", first_row_str.as_str()),
                ("page_size", page_size_str.as_str()),
            ],
        );

        let rows = self
            .connection
            .backend_mut()
            .fetch(&statement, first_row, page_size)
            .map_err(|e| ExecutorError::backend_failed("fetch", e))?;

        // Count and page ran against the same snapshot; not retried
        if rows.is_empty() {
            let total_str = total.to_string();
            log_event(
                Event::PageConsistencyViolation,
                &[
                    ("type", model.name()),
                    ("total", total_str.as_str()),
                    ("first_row", first_row_str.as_str()),
                ],
            );
            return Err(ExecutorError::page_inconsistent(model.name(), total, first_row).into());
        }

        Ok((total, rows))
    }

    fn model(&self, model_type: &str) -> Result<&'a TypeMetadata> {
        self.registry
            .type_named(model_type)
            .ok_or_else(|| CompileError::unknown_type(model_type).into())
    }

    fn compiler(&mut self, model: &'a TypeMetadata) -> PredicateCompiler<'a> {
        let full_text = self.connection.full_text();
        PredicateCompiler::new(model, self.options, full_text)
    }

    fn compile(&mut self, model: &'a TypeMetadata, filter: &Filter) -> Result<CompiledPredicate> {
        Ok(self.compiler(model).compile(filter)?)
    }

    fn run_count(&mut self, model: &TypeMetadata, predicate: &CompiledPredicate) -> Result<u64> {
        let statement = Statement::count(model.entity(), &self.options.entity_alias, predicate);
        let total = self
            .connection
            .backend_mut()
            .count(&statement)
            .map_err(|e| ExecutorError::backend_failed("count", e))?;

        let total_str = total.to_string();
        log_event(
            Event::QueryCount,
            &[("type", model.name()), ("total", total_str.as_str())],
        );
        Ok(total)
    }
}
