//! Document encoder
//!
//! Inverse of the decoder: writes the type code first, then each field in
//! field id order using the same physical naming the decoder parses.

use std::collections::BTreeMap;

use crate::registry::{FieldId, FieldRegistry, TypeMetadata};

use super::decoder::TYPE_CODE_FIELD;
use super::document::{IndexedDocument, StoredValue};
use super::errors::{CodecError, CodecResult};
use super::key::{Dimension, PhysicalKey};
use super::value::{Materialized, MaterializedValue, TypedValue};

/// Encodes field maps into index documents
pub struct DocumentEncoder<'a> {
    registry: &'a FieldRegistry,
}

impl<'a> DocumentEncoder<'a> {
    pub fn new(registry: &'a FieldRegistry) -> Self {
        Self { registry }
    }

    /// Encodes `fields` as a document of `model_type`
    pub fn encode(
        &self,
        model_type: &str,
        fields: &BTreeMap<FieldId, MaterializedValue>,
    ) -> CodecResult<IndexedDocument> {
        let model = self
            .registry
            .type_named(model_type)
            .ok_or_else(|| CodecError::unknown_type(model_type))?;

        let mut document = IndexedDocument::new().with(
            TYPE_CODE_FIELD,
            StoredValue::Long(i64::from(model.type_code())),
        );

        for (id, value) in fields {
            if model.field(id.as_str()).is_none() {
                return Err(CodecError::unknown_field(model.name(), id.as_str()));
            }
            match &value.value {
                Materialized::Sequence(values) => {
                    for element in values {
                        document.push(id.as_str(), self.encode_scalar(model, id, element)?);
                    }
                }
                Materialized::Single(TypedValue::LanguageText(texts)) => {
                    for (code, text) in texts {
                        let key = PhysicalKey::with_dimension(
                            id.clone(),
                            Dimension::Language(code.clone()),
                        );
                        document.push(key.physical_name(), StoredValue::text(text.as_str()));
                    }
                }
                Materialized::Single(TypedValue::Range { lower, upper }) => {
                    let lower_key = PhysicalKey::with_dimension(id.clone(), Dimension::Lower);
                    let upper_key = PhysicalKey::with_dimension(id.clone(), Dimension::Upper);
                    document.push(lower_key.physical_name(), self.encode_scalar(model, id, lower)?);
                    document.push(upper_key.physical_name(), self.encode_scalar(model, id, upper)?);
                }
                Materialized::Single(single) => {
                    document.push(id.as_str(), self.encode_scalar(model, id, single)?);
                }
            }
        }

        Ok(document)
    }

    fn encode_scalar(
        &self,
        model: &TypeMetadata,
        id: &FieldId,
        value: &TypedValue,
    ) -> CodecResult<StoredValue> {
        let stored = match value {
            TypedValue::Identifier(uuid) => StoredValue::Text(uuid.to_string()),
            TypedValue::Boolean(b) => StoredValue::Long(i64::from(*b)),
            TypedValue::Integer(n) => StoredValue::Long(i64::from(*n)),
            TypedValue::Long(n) => StoredValue::Long(*n),
            TypedValue::Double(d) => StoredValue::Double(*d),
            TypedValue::Float(f) => StoredValue::Double(f64::from(*f)),
            TypedValue::Date(date) => StoredValue::Long(date.timestamp_millis()),
            TypedValue::Text(s) => StoredValue::Text(s.clone()),
            TypedValue::Path(path) => StoredValue::Text(path.to_string_lossy().into_owned()),
            TypedValue::StringConstructible { text, .. } => StoredValue::Text(text.clone()),
            TypedValue::Enumeration { kind, name } => {
                let enum_kind = self.registry.enum_kind(kind).ok_or_else(|| {
                    CodecError::invalid_value(id.as_str(), format!("unknown enum kind '{}'", kind))
                })?;
                let variant = enum_kind.variant_by_name(name).ok_or_else(|| {
                    CodecError::invalid_value(
                        id.as_str(),
                        format!("'{}' is not a {} variant", name, kind),
                    )
                })?;
                match (enum_kind.coded, variant.code) {
                    (true, Some(code)) => StoredValue::Long(code),
                    _ => StoredValue::Text(variant.name.clone()),
                }
            }
            TypedValue::Range { .. } | TypedValue::LanguageText(_) => {
                return Err(CodecError::unsupported_shape(
                    id.as_str(),
                    format!("nested composite value in '{}'", model.name()),
                ))
            }
        };
        Ok(stored)
    }
}
