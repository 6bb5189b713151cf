//! Result ordering

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::registry::FieldId;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Keyword written into the ORDER BY clause
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// One requested ordering term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to sort by
    pub field: FieldId,
    /// Sort direction
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<FieldId>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<FieldId>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Parses `field` or `field:asc` / `field:desc`
impl FromStr for SortSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.split_once(':') {
            Some((field, dir)) => (field, dir),
            None => (s, "asc"),
        };
        if field.is_empty() {
            return Err(format!("missing field in ordering '{}'", s));
        }
        match direction.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortSpec::asc(field)),
            "desc" => Ok(SortSpec::desc(field)),
            other => Err(format!("unknown sort direction '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_spec() {
        let asc = SortSpec::asc("created_at");
        assert_eq!(asc.direction, SortDirection::Asc);
        assert_eq!(asc.field.as_str(), "created_at");
        assert_eq!(SortDirection::Desc.as_sql(), "DESC");
    }

    #[test]
    fn test_sort_spec_parse() {
        assert_eq!("name".parse::<SortSpec>().unwrap(), SortSpec::asc("name"));
        assert_eq!("name:DESC".parse::<SortSpec>().unwrap(), SortSpec::desc("name"));
        assert!("name:sideways".parse::<SortSpec>().is_err());
        assert!(":asc".parse::<SortSpec>().is_err());
    }
}
