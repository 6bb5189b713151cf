//! Stored index documents
//!
//! An index document is a flat, ordered list of named stored values.
//! Names may repeat (one entry per collection element).

use serde::{Deserialize, Serialize};

/// A raw stored value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Long(i64),
    Double(f64),
    Text(String),
}

impl StoredValue {
    pub fn text(text: impl Into<String>) -> Self {
        StoredValue::Text(text.into())
    }

    /// Kind name for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            StoredValue::Long(_) => "long",
            StoredValue::Double(_) => "double",
            StoredValue::Text(_) => "text",
        }
    }
}

/// One physical field of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredField {
    pub name: String,
    pub value: StoredValue,
}

/// A document as read from the index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    #[serde(default)]
    pub fields: Vec<StoredField>,
}

impl IndexedDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, builder style
    pub fn with(mut self, name: impl Into<String>, value: StoredValue) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: StoredValue) {
        self.fields.push(StoredField {
            name: name.into(),
            value,
        });
    }

    /// First value stored under `name`
    pub fn get(&self, name: &str) -> Option<&StoredValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoredField> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_from_json() {
        let doc: IndexedDocument = serde_json::from_value(json!({
            "fields": [
                { "name": "_type", "value": 1 },
                { "name": "amount", "value": 2.5 },
                { "name": "tags", "value": "a" },
                { "name": "tags", "value": "b" }
            ]
        }))
        .unwrap();

        assert_eq!(doc.len(), 4);
        assert_eq!(doc.get("_type"), Some(&StoredValue::Long(1)));
        assert_eq!(doc.get("amount"), Some(&StoredValue::Double(2.5)));
        assert_eq!(doc.get("tags"), Some(&StoredValue::text("a")));
    }
}
