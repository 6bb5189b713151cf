//! Relational dialects and full-text capability

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Relational backend dialect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// No vendor full-text syntax
    #[default]
    Generic,
    Oracle,
    SqlServer,
    Postgres,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::Oracle => "oracle",
            Dialect::SqlServer => "sqlserver",
            Dialect::Postgres => "postgres",
        }
    }

    /// Returns true if this dialect has a full-text predicate at all
    pub fn has_full_text(&self) -> bool {
        !matches!(self, Dialect::Generic)
    }

    /// Vendor full-text predicate over `column` for an already sanitized
    /// `text`. `None` for dialects without full-text syntax.
    pub fn full_text_predicate(&self, column: &str, text: &str) -> Option<String> {
        match self {
            Dialect::Generic => None,
            Dialect::Oracle => Some(format!("CONTAINS({}, '{}') > 0", column, text)),
            Dialect::SqlServer => Some(format!("CONTAINS({}, '\"{}\"')", column, text)),
            Dialect::Postgres => Some(format!(
                "to_tsvector({}) @@ plainto_tsquery('{}')",
                column, text
            )),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generic" => Ok(Dialect::Generic),
            "oracle" => Ok(Dialect::Oracle),
            "sqlserver" => Ok(Dialect::SqlServer),
            "postgres" => Ok(Dialect::Postgres),
            other => Err(format!("unknown dialect '{}'", other)),
        }
    }
}

/// Whether one connection can run vendor full-text predicates.
///
/// Probed once per connection and passed to the compiler explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullTextCapability {
    Supported,
    Unsupported,
}

impl FullTextCapability {
    pub fn from_probe(supported: bool) -> Self {
        if supported {
            FullTextCapability::Supported
        } else {
            FullTextCapability::Unsupported
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, FullTextCapability::Supported)
    }
}
