//! Physical field names
//!
//! A physical name is either a bare field id or `<field id>.<dimension>`,
//! where the dimension is a registry language or one of the range bound
//! tokens. Any other suffix stays part of the field id.

use std::fmt;

use crate::registry::{FieldId, FieldRegistry};

pub const LOWER_TOKEN: &str = "lower";
pub const UPPER_TOKEN: &str = "upper";

/// What distinguishes the sub-fields of one logical field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dimension {
    Language(String),
    Lower,
    Upper,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Language(code) => f.write_str(code),
            Dimension::Lower => f.write_str(LOWER_TOKEN),
            Dimension::Upper => f.write_str(UPPER_TOKEN),
        }
    }
}

/// A parsed physical field name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalKey {
    pub field: FieldId,
    pub dimension: Option<Dimension>,
}

impl PhysicalKey {
    pub fn plain(field: impl Into<FieldId>) -> Self {
        Self {
            field: field.into(),
            dimension: None,
        }
    }

    pub fn with_dimension(field: impl Into<FieldId>, dimension: Dimension) -> Self {
        Self {
            field: field.into(),
            dimension: Some(dimension),
        }
    }

    /// Splits `name` at its last '.' when the suffix is a known dimension
    pub fn parse(name: &str, registry: &FieldRegistry) -> Self {
        let (field, suffix) = match name.rsplit_once('.') {
            Some(parts) => parts,
            None => return Self::plain(name),
        };

        let dimension = match suffix {
            LOWER_TOKEN => Dimension::Lower,
            UPPER_TOKEN => Dimension::Upper,
            code if registry.is_language(code) => Dimension::Language(code.to_string()),
            _ => return Self::plain(name),
        };
        Self::with_dimension(field, dimension)
    }

    /// Physical name this key is stored under
    pub fn physical_name(&self) -> String {
        match &self.dimension {
            Some(dimension) => format!("{}.{}", self.field, dimension),
            None => self.field.to_string(),
        }
    }
}
