//! Predicate compiler
//!
//! Turns a [`Filter`] into a WHERE predicate over `<alias>.<column>` terms
//! plus the named parameters it references.
//!
//! Compilation is two traversals in the same order:
//! 1. Emit the predicate text, one parenthesized term per leaf
//! 2. Bind parameters, skipping exactly what the first pass skipped
//!
//! Both passes draw parameter names from a fresh [`ParameterNamer`], so the
//! names always line up.

use std::collections::HashMap;

use serde::Serialize;

use crate::filter::{Filter, Occur, QualifiedClause, QueryClause, RangeBound, TextMatch, Value};
use crate::observability::{log_event, Event};
use crate::registry::{FieldId, FieldMetadata, TypeMetadata};

use super::dialect::{Dialect, FullTextCapability};
use super::errors::{CompileError, CompileResult};
use super::ordering::SortSpec;
use super::sanitize::sanitize_text;

/// Predicate emitted when nothing restricts the result
pub const MATCH_ALL: &str = "1 = 1";

/// Predicate emitted for an empty IN set
const MATCH_NONE: &str = "1 = 0";

/// Compiler settings shared by every compilation of one deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    pub dialect: Dialect,
    /// Alias of the queried entity in the generated predicate
    pub entity_alias: String,
    /// Unique field appended last to every ordering
    pub tie_break: FieldId,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::Generic,
            entity_alias: "entity".to_string(),
            tie_break: FieldId::from("oid"),
        }
    }
}

/// Value bound to one named parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BoundValue {
    Single(Value),
    List(Vec<Value>),
}

/// One named parameter and its value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterBinding {
    pub name: String,
    pub value: BoundValue,
}

/// Ordered parameter bindings of one compiled predicate
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterPlan {
    bindings: Vec<ParameterBinding>,
}

impl ParameterPlan {
    fn push(&mut self, name: String, value: BoundValue) {
        self.bindings.push(ParameterBinding { name, value });
    }

    /// Looks up a binding by parameter name
    pub fn get(&self, name: &str) -> Option<&BoundValue> {
        self.bindings
            .iter()
            .find(|b| b.name == name)
            .map(|b| &b.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterBinding> {
        self.bindings.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// A compiled filter
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPredicate {
    /// Predicate text, without the WHERE keyword
    pub predicate: String,
    pub parameters: ParameterPlan,
    /// True when nothing restricts the result
    pub match_all: bool,
    /// Fields whose clauses were left out for the relational backend
    pub dropped: Vec<FieldId>,
}

impl CompiledPredicate {
    fn match_all(dropped: Vec<FieldId>) -> Self {
        Self {
            predicate: MATCH_ALL.to_string(),
            parameters: ParameterPlan::default(),
            match_all: true,
            dropped,
        }
    }

    /// `WHERE (<predicate>)`
    pub fn where_clause(&self) -> String {
        format!("WHERE ({})", self.predicate)
    }
}

/// Hands out parameter names; repeats of a base name get a numeric suffix
#[derive(Debug, Default)]
struct ParameterNamer {
    seen: HashMap<String, usize>,
}

impl ParameterNamer {
    fn next(&mut self, base: &str) -> String {
        let count = self.seen.entry(base.to_string()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base.to_string()
        } else {
            format!("{}_{}", base, count)
        }
    }
}

/// Compiles filters over one model type
pub struct PredicateCompiler<'a> {
    model: &'a TypeMetadata,
    options: &'a CompilerOptions,
    full_text: FullTextCapability,
}

impl<'a> PredicateCompiler<'a> {
    /// Creates a compiler. `full_text` is the capability of the connection
    /// the predicate will run on.
    pub fn new(
        model: &'a TypeMetadata,
        options: &'a CompilerOptions,
        full_text: FullTextCapability,
    ) -> Self {
        Self {
            model,
            options,
            full_text,
        }
    }

    pub fn model(&self) -> &TypeMetadata {
        self.model
    }

    /// Compiles `filter` into a predicate and its parameter plan.
    ///
    /// An empty filter, or one whose every clause is dropped, matches
    /// everything.
    pub fn compile(&self, filter: &Filter) -> CompileResult<CompiledPredicate> {
        if filter.is_empty() {
            log_event(Event::FilterEmpty, &[("type", self.model.name())]);
            return Ok(CompiledPredicate::match_all(Vec::new()));
        }

        let mut predicate = String::new();
        let mut dropped = Vec::new();
        let emitted = self.emit_set(
            &filter.clauses,
            &mut ParameterNamer::default(),
            &mut predicate,
            &mut dropped,
        )?;

        if !emitted {
            return Ok(CompiledPredicate::match_all(dropped));
        }

        let mut parameters = ParameterPlan::default();
        self.bind_set(&filter.clauses, &mut ParameterNamer::default(), &mut parameters)?;

        Ok(CompiledPredicate {
            predicate,
            parameters,
            match_all: false,
            dropped,
        })
    }

    /// Compiles the ORDER BY terms (without the keyword). The tie-break
    /// field always comes last, ascending.
    pub fn compile_ordering(&self, orderings: &[SortSpec]) -> CompileResult<String> {
        let mut terms = Vec::with_capacity(orderings.len() + 1);

        for spec in orderings {
            let field = self.field(&spec.field)?;
            if !field.relational {
                log_event(
                    Event::ClauseDropped,
                    &[("field", field.id.as_str()), ("kind", "ordering")],
                );
                continue;
            }
            terms.push(format!(
                "{} {}",
                self.column(field),
                spec.direction.as_sql()
            ));
        }

        let tie_break = &self.options.tie_break;
        let tie_break_column = match self.model.field(tie_break.as_str()) {
            Some(field) => self.column(field),
            None => format!("{}.{}", self.options.entity_alias, tie_break),
        };
        terms.push(format!("{} ASC", tie_break_column));

        Ok(terms.join(", "))
    }

    fn field(&self, id: &FieldId) -> CompileResult<&'a FieldMetadata> {
        self.model
            .field(id.as_str())
            .ok_or_else(|| CompileError::unknown_field(self.model.name(), id.as_str()))
    }

    fn column(&self, field: &FieldMetadata) -> String {
        format!("{}.{}", self.options.entity_alias, field.column_name())
    }

    /// Appends the clause set to `out`; returns false if nothing was emitted.
    fn emit_set(
        &self,
        clauses: &[QualifiedClause],
        namer: &mut ParameterNamer,
        out: &mut String,
        dropped: &mut Vec<FieldId>,
    ) -> CompileResult<bool> {
        let mut emitted = false;

        for qualified in clauses {
            let term = match self.emit_clause(&qualified.clause, namer, dropped)? {
                Some(term) => term,
                None => continue,
            };

            if emitted {
                out.push(' ');
                out.push_str(qualified.occur.join_token());
                out.push(' ');
                out.push_str(&term);
            } else if qualified.occur == Occur::MustNot {
                // No join token to carry the negation
                out.push_str("NOT ");
                out.push_str(&term);
            } else {
                out.push_str(&term);
            }
            emitted = true;
        }

        Ok(emitted)
    }

    /// One parenthesized term, or `None` if the clause is dropped.
    fn emit_clause(
        &self,
        clause: &QueryClause,
        namer: &mut ParameterNamer,
        dropped: &mut Vec<FieldId>,
    ) -> CompileResult<Option<String>> {
        if let QueryClause::Boolean { clauses } = clause {
            let mut inner = String::new();
            if self.emit_set(clauses, namer, &mut inner, dropped)? {
                return Ok(Some(format!("({})", inner)));
            }
            return Ok(None);
        }

        let field = match self.leaf_field(clause)? {
            Some(field) => field,
            None => return Ok(None),
        };
        // Unbounded ranges fail whether or not the field is dropped
        if let QueryClause::Range {
            lower: None,
            upper: None,
            ..
        } = clause
        {
            return Err(CompileError::unbounded_range(field.id.as_str()));
        }
        if !field.relational {
            log_event(
                Event::ClauseDropped,
                &[("field", field.id.as_str()), ("kind", clause.kind())],
            );
            dropped.push(field.id.clone());
            return Ok(None);
        }
        let column = self.column(field);
        let id = field.id.as_str();

        let term = match clause {
            QueryClause::Equals { .. } => {
                format!("{} = :{}", column, namer.next(id))
            }
            QueryClause::Range { lower, upper, .. } => {
                self.check_range(id, lower.as_ref(), upper.as_ref())?;
                match (lower, upper) {
                    (Some(_), Some(_)) => format!(
                        "{} BETWEEN :{} AND :{}",
                        column,
                        namer.next(&start_name(id)),
                        namer.next(&end_name(id))
                    ),
                    (Some(_), None) => format!("{} >= :{}", column, namer.next(&start_name(id))),
                    (None, Some(_)) => format!("{} <= :{}", column, namer.next(&end_name(id))),
                    (None, None) => return Err(CompileError::unbounded_range(id)),
                }
            }
            QueryClause::ContainsText { text, mode, .. } => {
                match self.text_predicate(&column, text, *mode) {
                    Some(term) => term,
                    None => {
                        log_event(Event::TextFilterEmpty, &[("field", id)]);
                        dropped.push(field.id.clone());
                        return Ok(None);
                    }
                }
            }
            QueryClause::ContainedIn { values, .. } => {
                if values.is_empty() {
                    MATCH_NONE.to_string()
                } else {
                    format!("{} IN :{}", column, namer.next(id))
                }
            }
            QueryClause::Boolean { .. } => return Ok(None),
        };

        Ok(Some(format!("({})", term)))
    }

    /// Mirrors `emit_set`, recording every named parameter.
    fn bind_set(
        &self,
        clauses: &[QualifiedClause],
        namer: &mut ParameterNamer,
        plan: &mut ParameterPlan,
    ) -> CompileResult<()> {
        for qualified in clauses {
            let clause = &qualified.clause;
            if let QueryClause::Boolean { clauses } = clause {
                self.bind_set(clauses, namer, plan)?;
                continue;
            }

            let field = match self.leaf_field(clause)? {
                Some(field) if field.relational => field,
                _ => continue,
            };
            let id = field.id.as_str();

            match clause {
                QueryClause::Equals { value, .. } => {
                    plan.push(namer.next(id), BoundValue::Single(value.bind_form()));
                }
                QueryClause::Range { lower, upper, .. } => {
                    if let Some(bound) = lower {
                        plan.push(
                            namer.next(&start_name(id)),
                            BoundValue::Single(bound.value.bind_form()),
                        );
                    }
                    if let Some(bound) = upper {
                        plan.push(
                            namer.next(&end_name(id)),
                            BoundValue::Single(bound.value.bind_form()),
                        );
                    }
                }
                QueryClause::ContainedIn { values, .. } => {
                    if !values.is_empty() {
                        plan.push(
                            namer.next(id),
                            BoundValue::List(values.iter().map(Value::bind_form).collect()),
                        );
                    }
                }
                // Literal already inlined
                QueryClause::ContainsText { .. } => {}
                QueryClause::Boolean { .. } => {}
            }
        }
        Ok(())
    }

    /// Field metadata of a leaf clause
    fn leaf_field(&self, clause: &QueryClause) -> CompileResult<Option<&'a FieldMetadata>> {
        match clause.field() {
            Some(id) => self.field(id).map(Some),
            None => Ok(None),
        }
    }

    fn check_range(
        &self,
        id: &str,
        lower: Option<&RangeBound>,
        upper: Option<&RangeBound>,
    ) -> CompileResult<()> {
        if lower.is_none() && upper.is_none() {
            return Err(CompileError::unbounded_range(id));
        }
        // Exclusive bounds still compile inclusive; surfaced, not corrected.
        if lower.iter().chain(upper.iter()).any(|b| !b.inclusive) {
            log_event(Event::RangeBoundWidened, &[("field", id)]);
        }
        Ok(())
    }

    /// Text match term, or `None` if sanitization left no text.
    fn text_predicate(&self, column: &str, text: &str, mode: TextMatch) -> Option<String> {
        let cleaned = sanitize_text(text, mode);
        if cleaned.is_empty() {
            return None;
        }

        if mode == TextMatch::FullText && self.full_text.is_supported() {
            if let Some(term) = self.options.dialect.full_text_predicate(column, &cleaned) {
                return Some(term);
            }
        }

        let upper = cleaned.to_uppercase();
        let pattern = match mode {
            TextMatch::Begin => format!("{}%", upper),
            TextMatch::End => format!("%{}", upper),
            TextMatch::Contain | TextMatch::FullText => format!("%{}%", upper),
        };
        Some(format!("UPPER({}) LIKE '{}'", column, pattern))
    }
}

fn start_name(id: &str) -> String {
    format!("{}Start", id)
}

fn end_name(id: &str) -> String {
    format!("{}End", id)
}
