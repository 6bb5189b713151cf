//! Materialized field values

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::registry::DataType;

/// One decoded value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TypedValue {
    Identifier(Uuid),
    Boolean(bool),
    Integer(i32),
    Long(i64),
    Double(f64),
    Float(f32),
    Date(DateTime<Utc>),
    Enumeration { kind: String, name: String },
    Text(String),
    Path(PathBuf),
    StringConstructible { type_name: String, text: String },
    Range {
        lower: Box<TypedValue>,
        upper: Box<TypedValue>,
    },
    /// Text per language code
    LanguageText(BTreeMap<String, String>),
}

impl TypedValue {
    pub fn range(lower: TypedValue, upper: TypedValue) -> Self {
        TypedValue::Range {
            lower: Box::new(lower),
            upper: Box::new(upper),
        }
    }

    pub fn enumeration(kind: impl Into<String>, name: impl Into<String>) -> Self {
        TypedValue::Enumeration {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

/// Single value or ordered collection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Materialized {
    Single(TypedValue),
    Sequence(Vec<TypedValue>),
}

/// The decoded value of one logical field, tagged with the data type it
/// was decoded as
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterializedValue {
    pub data_type: DataType,
    pub value: Materialized,
}

impl MaterializedValue {
    pub fn single(data_type: DataType, value: TypedValue) -> Self {
        Self {
            data_type,
            value: Materialized::Single(value),
        }
    }

    pub fn sequence(data_type: DataType, values: Vec<TypedValue>) -> Self {
        Self {
            data_type,
            value: Materialized::Sequence(values),
        }
    }

    pub fn as_single(&self) -> Option<&TypedValue> {
        match &self.value {
            Materialized::Single(v) => Some(v),
            Materialized::Sequence(_) => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[TypedValue]> {
        match &self.value {
            Materialized::Sequence(vs) => Some(vs),
            Materialized::Single(_) => None,
        }
    }
}
