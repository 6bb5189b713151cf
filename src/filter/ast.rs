//! Filter model structures
//!
//! A filter is an ordered set of qualified clauses. Clause order matters:
//! join tokens are emitted between consecutive clauses, never before the
//! first one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::registry::FieldId;

/// Boolean join semantics of one clause within its set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Occur {
    /// AND
    Must,
    /// AND NOT
    MustNot,
    /// OR
    Should,
}

impl Occur {
    /// Token joining this clause to the one before it
    pub fn join_token(&self) -> &'static str {
        match self {
            Occur::Must => "AND",
            Occur::MustNot => "AND NOT",
            Occur::Should => "OR",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Occur::Must => "MUST",
            Occur::MustNot => "MUST_NOT",
            Occur::Should => "SHOULD",
        }
    }
}

/// Text match modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextMatch {
    /// Value starts with the text
    #[serde(rename = "BEGIN")]
    Begin,
    /// Value ends with the text
    #[serde(rename = "END")]
    End,
    /// Value contains the text
    #[serde(rename = "CONTAIN")]
    Contain,
    /// Backend full-text search over every token
    #[serde(rename = "FULLTEXT")]
    FullText,
}

/// A value compared against a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Text(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
    Identifier(Uuid),
    Enumeration { kind: String, name: String },
}

impl Value {
    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }

    pub fn enumeration(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Value::Enumeration {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Value handed to the relational backend. Identifiers bind their
    /// string form, everything else binds as-is.
    pub fn bind_form(&self) -> Value {
        match self {
            Value::Identifier(id) => Value::Text(id.to_string()),
            other => other.clone(),
        }
    }
}

/// One end of a range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeBound {
    pub value: Value,
    #[serde(default = "default_inclusive")]
    pub inclusive: bool,
}

fn default_inclusive() -> bool {
    true
}

impl RangeBound {
    pub fn inclusive(value: Value) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    pub fn exclusive(value: Value) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }
}

/// A single clause of the filter tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "clause", rename_all = "snake_case")]
pub enum QueryClause {
    Equals {
        field: FieldId,
        value: Value,
    },
    /// At least one bound is expected; an unbounded range fails compilation
    Range {
        field: FieldId,
        #[serde(default)]
        lower: Option<RangeBound>,
        #[serde(default)]
        upper: Option<RangeBound>,
    },
    ContainsText {
        field: FieldId,
        text: String,
        mode: TextMatch,
    },
    ContainedIn {
        field: FieldId,
        values: Vec<Value>,
    },
    Boolean {
        clauses: Vec<QualifiedClause>,
    },
}

impl QueryClause {
    pub fn equals(field: impl Into<FieldId>, value: Value) -> Self {
        QueryClause::Equals {
            field: field.into(),
            value,
        }
    }

    /// Inclusive range; pass `None` for an open end
    pub fn range(field: impl Into<FieldId>, lower: Option<Value>, upper: Option<Value>) -> Self {
        QueryClause::Range {
            field: field.into(),
            lower: lower.map(RangeBound::inclusive),
            upper: upper.map(RangeBound::inclusive),
        }
    }

    pub fn range_bounds(
        field: impl Into<FieldId>,
        lower: Option<RangeBound>,
        upper: Option<RangeBound>,
    ) -> Self {
        QueryClause::Range {
            field: field.into(),
            lower,
            upper,
        }
    }

    pub fn contains_text(field: impl Into<FieldId>, text: impl Into<String>, mode: TextMatch) -> Self {
        QueryClause::ContainsText {
            field: field.into(),
            text: text.into(),
            mode,
        }
    }

    pub fn contained_in(field: impl Into<FieldId>, values: Vec<Value>) -> Self {
        QueryClause::ContainedIn {
            field: field.into(),
            values,
        }
    }

    /// Nested clause set
    pub fn boolean(filter: Filter) -> Self {
        QueryClause::Boolean {
            clauses: filter.clauses,
        }
    }

    /// Field this clause filters on; `None` for nested sets
    pub fn field(&self) -> Option<&FieldId> {
        match self {
            QueryClause::Equals { field, .. }
            | QueryClause::Range { field, .. }
            | QueryClause::ContainsText { field, .. }
            | QueryClause::ContainedIn { field, .. } => Some(field),
            QueryClause::Boolean { .. } => None,
        }
    }

    /// Clause kind name for logs and explain output
    pub fn kind(&self) -> &'static str {
        match self {
            QueryClause::Equals { .. } => "equals",
            QueryClause::Range { .. } => "range",
            QueryClause::ContainsText { .. } => "contains_text",
            QueryClause::ContainedIn { .. } => "contained_in",
            QueryClause::Boolean { .. } => "boolean",
        }
    }
}

/// A clause and how it joins its predecessor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifiedClause {
    pub clause: QueryClause,
    pub occur: Occur,
}

/// Root clause set of a filter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub clauses: Vec<QualifiedClause>,
}

impl Filter {
    /// Filter with no restriction
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with(mut self, clause: QueryClause, occur: Occur) -> Self {
        self.clauses.push(QualifiedClause { clause, occur });
        self
    }

    pub fn must(self, clause: QueryClause) -> Self {
        self.with(clause, Occur::Must)
    }

    pub fn must_not(self, clause: QueryClause) -> Self {
        self.with(clause, Occur::MustNot)
    }

    pub fn should(self, clause: QueryClause) -> Self {
        self.with(clause, Occur::Should)
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Number of leaf clauses in the whole tree
    pub fn leaf_count(&self) -> usize {
        fn count(clauses: &[QualifiedClause]) -> usize {
            clauses
                .iter()
                .map(|q| match &q.clause {
                    QueryClause::Boolean { clauses } => count(clauses),
                    _ => 1,
                })
                .sum()
        }
        count(&self.clauses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_builder() {
        let filter = Filter::all()
            .must(QueryClause::equals("status", Value::text("ACTIVE")))
            .should(QueryClause::boolean(
                Filter::all()
                    .must(QueryClause::equals("a", Value::Integer(1)))
                    .must(QueryClause::equals("b", Value::Integer(2))),
            ));

        assert_eq!(filter.clauses.len(), 2);
        assert_eq!(filter.leaf_count(), 3);
        assert_eq!(filter.clauses[1].occur, Occur::Should);
    }

    #[test]
    fn test_join_tokens() {
        assert_eq!(Occur::Must.join_token(), "AND");
        assert_eq!(Occur::MustNot.join_token(), "AND NOT");
        assert_eq!(Occur::Should.join_token(), "OR");
    }

    #[test]
    fn test_identifier_binds_string_form() {
        let id = Uuid::nil();
        assert_eq!(
            Value::Identifier(id).bind_form(),
            Value::Text("00000000-0000-0000-0000-000000000000".into())
        );
        assert_eq!(Value::Boolean(true).bind_form(), Value::Boolean(true));
    }

    #[test]
    fn test_filter_from_json() {
        let filter: Filter = serde_json::from_value(json!({
            "clauses": [
                {
                    "occur": "MUST",
                    "clause": {
                        "clause": "equals",
                        "field": "status",
                        "value": { "type": "text", "value": "ACTIVE" }
                    }
                },
                {
                    "occur": "MUST_NOT",
                    "clause": {
                        "clause": "contains_text",
                        "field": "name",
                        "text": "acme",
                        "mode": "BEGIN"
                    }
                },
                {
                    "occur": "SHOULD",
                    "clause": {
                        "clause": "range",
                        "field": "amount",
                        "lower": { "value": { "type": "integer", "value": 10 } }
                    }
                }
            ]
        }))
        .unwrap();

        assert_eq!(filter.clauses.len(), 3);
        assert_eq!(filter.clauses[1].occur, Occur::MustNot);
        match &filter.clauses[2].clause {
            QueryClause::Range { lower, upper, .. } => {
                assert!(lower.as_ref().unwrap().inclusive);
                assert!(upper.is_none());
            }
            other => panic!("unexpected clause {:?}", other),
        }
    }
}
