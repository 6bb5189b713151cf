//! Document decoder
//!
//! Decode flow (strict order):
//! 1. Resolve the reserved type-code field against the registry
//! 2. Group physical fields by logical field id, in document order
//! 3. Materialize each group by the shape its metadata declares
//!
//! Any group that does not fit its declared shape fails the whole
//! document. There are no partial results.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use chrono::DateTime;
use serde::Serialize;
use uuid::Uuid;

use crate::observability::{log_event, Event};
use crate::registry::{DataType, FieldId, FieldMetadata, FieldRegistry, TypeMetadata};

use super::document::{IndexedDocument, StoredValue};
use super::errors::{CodecError, CodecResult};
use super::key::{Dimension, PhysicalKey};
use super::value::{MaterializedValue, TypedValue};

/// Reserved field holding the model type code
pub const TYPE_CODE_FIELD: &str = "_type";

/// A decoded document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedDocument {
    pub model_type: String,
    pub type_code: u32,
    pub fields: BTreeMap<FieldId, MaterializedValue>,
}

impl DecodedDocument {
    pub fn get(&self, field: &str) -> Option<&MaterializedValue> {
        self.fields.get(field)
    }
}

/// Physical parts of one logical field, in document order
type Group<'d> = Vec<(Option<Dimension>, &'d StoredValue)>;

/// Decodes index documents against a registry
pub struct DocumentDecoder<'a> {
    registry: &'a FieldRegistry,
}

impl<'a> DocumentDecoder<'a> {
    pub fn new(registry: &'a FieldRegistry) -> Self {
        Self { registry }
    }

    /// Decodes every logical field of `document`
    pub fn decode(&self, document: &IndexedDocument) -> CodecResult<DecodedDocument> {
        let model = self.resolve_type(document)?;

        let mut fields = BTreeMap::new();
        for (id, parts) in self.group(model, document) {
            // Grouping only keeps declared fields
            let meta = match model.field(id.as_str()) {
                Some(meta) => meta,
                None => continue,
            };
            let value = self.decode_group(model, meta, parts)?;
            fields.insert(id, value);
        }

        Ok(DecodedDocument {
            model_type: model.name().to_string(),
            type_code: model.type_code(),
            fields,
        })
    }

    fn resolve_type(&self, document: &IndexedDocument) -> CodecResult<&'a TypeMetadata> {
        let raw = document
            .get(TYPE_CODE_FIELD)
            .ok_or_else(|| CodecError::missing_type_code(TYPE_CODE_FIELD))?;

        let code = match raw {
            StoredValue::Long(n) => u32::try_from(*n).ok(),
            StoredValue::Text(s) => s.trim().parse::<u32>().ok(),
            StoredValue::Double(_) => None,
        };
        code.and_then(|c| self.registry.metadata_for(c))
            .ok_or_else(|| match raw {
                StoredValue::Long(n) => CodecError::unknown_type_code(n),
                StoredValue::Double(d) => CodecError::unknown_type_code(d),
                StoredValue::Text(s) => CodecError::unknown_type_code(s),
            })
    }

    /// Groups physical fields by logical id, keeping first-seen order
    fn group<'d>(
        &self,
        model: &TypeMetadata,
        document: &'d IndexedDocument,
    ) -> Vec<(FieldId, Group<'d>)> {
        let mut groups: Vec<(FieldId, Group<'d>)> = Vec::new();
        let mut positions: HashMap<FieldId, usize> = HashMap::new();

        for stored in document.iter() {
            if stored.name == TYPE_CODE_FIELD {
                continue;
            }
            let key = PhysicalKey::parse(&stored.name, self.registry);
            if model.field(key.field.as_str()).is_none() {
                log_event(
                    Event::DocumentFieldSkipped,
                    &[("type", model.name()), ("field", stored.name.as_str())],
                );
                continue;
            }

            let pos = *positions.entry(key.field.clone()).or_insert_with(|| {
                groups.push((key.field.clone(), Vec::new()));
                groups.len() - 1
            });
            groups[pos].1.push((key.dimension, &stored.value));
        }

        groups
    }

    fn decode_group(
        &self,
        model: &TypeMetadata,
        meta: &FieldMetadata,
        parts: Group<'_>,
    ) -> CodecResult<MaterializedValue> {
        let id = meta.id.as_str();
        let value_type = model.value_type(meta);

        if meta.is_language_keyed() {
            let mut texts = BTreeMap::new();
            for (dimension, value) in parts {
                let code = match dimension {
                    Some(Dimension::Language(code)) => code,
                    _ => {
                        return Err(CodecError::unsupported_shape(
                            id,
                            "language keyed field needs one sub-field per language",
                        ))
                    }
                };
                let text = match value {
                    StoredValue::Text(text) => text.clone(),
                    other => return Err(mismatch(id, "text", other)),
                };
                if texts.insert(code.clone(), text).is_some() {
                    return Err(CodecError::unsupported_shape(
                        id,
                        format!("language '{}' stored twice", code),
                    ));
                }
            }
            return Ok(MaterializedValue::single(
                value_type.clone(),
                TypedValue::LanguageText(texts),
            ));
        }

        if meta.collection {
            let mut values = Vec::with_capacity(parts.len());
            for (dimension, value) in parts {
                if dimension.is_some() {
                    return Err(CodecError::unsupported_shape(
                        id,
                        "collection elements cannot carry a dimension",
                    ));
                }
                values.push(self.decode_scalar(id, value_type, value)?);
            }
            return Ok(MaterializedValue::sequence(value_type.clone(), values));
        }

        // One plain sub-field is a scalar, range-flagged or not
        match parts.as_slice() {
            [(None, value)] => Ok(MaterializedValue::single(
                value_type.clone(),
                self.decode_scalar(id, value_type, value)?,
            )),
            _ if meta.range => self.decode_range(id, value_type, &parts),
            _ => Err(CodecError::unsupported_shape(
                id,
                format!("expected one sub-field, found {}", parts.len()),
            )),
        }
    }

    fn decode_range(
        &self,
        id: &str,
        value_type: &DataType,
        parts: &[(Option<Dimension>, &StoredValue)],
    ) -> CodecResult<MaterializedValue> {
        let mut lower = None;
        let mut upper = None;

        for (dimension, value) in parts {
            let slot = match dimension {
                Some(Dimension::Lower) => &mut lower,
                Some(Dimension::Upper) => &mut upper,
                _ => {
                    return Err(CodecError::unsupported_shape(
                        id,
                        "range sub-fields must be lower and upper",
                    ))
                }
            };
            if slot.replace(*value).is_some() {
                return Err(CodecError::unsupported_shape(id, "range bound stored twice"));
            }
        }

        match (lower, upper) {
            (Some(lower), Some(upper)) => Ok(MaterializedValue::single(
                value_type.clone(),
                TypedValue::range(
                    self.decode_scalar(id, value_type, lower)?,
                    self.decode_scalar(id, value_type, upper)?,
                ),
            )),
            _ => Err(CodecError::unsupported_shape(
                id,
                "range needs exactly one lower and one upper sub-field",
            )),
        }
    }

    fn decode_scalar(
        &self,
        id: &str,
        data_type: &DataType,
        value: &StoredValue,
    ) -> CodecResult<TypedValue> {
        let decoded = match (data_type, value) {
            (DataType::Identifier, StoredValue::Text(s)) => Uuid::parse_str(s)
                .map(TypedValue::Identifier)
                .map_err(|e| CodecError::invalid_value(id, e.to_string()))?,
            (DataType::Boolean, StoredValue::Long(n)) => match n {
                0 => TypedValue::Boolean(false),
                1 => TypedValue::Boolean(true),
                other => {
                    return Err(CodecError::invalid_value(
                        id,
                        format!("boolean stored as {}, expected 0 or 1", other),
                    ))
                }
            },
            (DataType::Integer, StoredValue::Long(n)) => i32::try_from(*n)
                .map(TypedValue::Integer)
                .map_err(|_| CodecError::invalid_value(id, format!("{} overflows an integer", n)))?,
            (DataType::Long, StoredValue::Long(n)) => TypedValue::Long(*n),
            (DataType::Double, StoredValue::Double(d)) => TypedValue::Double(*d),
            (DataType::Double, StoredValue::Long(n)) => TypedValue::Double(*n as f64),
            (DataType::Float, StoredValue::Double(d)) => TypedValue::Float(*d as f32),
            (DataType::Float, StoredValue::Long(n)) => TypedValue::Float(*n as f32),
            (DataType::Date, StoredValue::Long(millis)) => DateTime::from_timestamp_millis(*millis)
                .map(TypedValue::Date)
                .ok_or_else(|| {
                    CodecError::invalid_value(id, format!("{} ms is out of range", millis))
                })?,
            (DataType::String, StoredValue::Text(s)) => TypedValue::Text(s.clone()),
            (DataType::Path, StoredValue::Text(s)) => TypedValue::Path(PathBuf::from(s)),
            (DataType::StringConstructible { type_name }, StoredValue::Text(s)) => {
                TypedValue::StringConstructible {
                    type_name: type_name.clone(),
                    text: s.clone(),
                }
            }
            (DataType::Enumeration { kind }, value) => self.decode_enum(id, kind, value)?,
            (DataType::LanguageText | DataType::Summary, _) => {
                return Err(CodecError::unsupported_shape(
                    id,
                    "language keyed value outside a language group",
                ))
            }
            (expected, other) => return Err(mismatch(id, expected.type_name(), other)),
        };
        Ok(decoded)
    }

    fn decode_enum(&self, id: &str, kind: &str, value: &StoredValue) -> CodecResult<TypedValue> {
        let enum_kind = self
            .registry
            .enum_kind(kind)
            .ok_or_else(|| CodecError::invalid_value(id, format!("unknown enum kind '{}'", kind)))?;

        let variant = match (enum_kind.coded, value) {
            (true, StoredValue::Long(code)) => enum_kind.variant_by_code(*code),
            (false, StoredValue::Text(name)) => enum_kind.variant_by_name(name),
            (true, other) => return Err(mismatch(id, "enum code", other)),
            (false, other) => return Err(mismatch(id, "enum name", other)),
        };

        variant
            .map(|v| TypedValue::enumeration(kind, v.name.as_str()))
            .ok_or_else(|| {
                CodecError::invalid_value(id, format!("no '{}' variant for {:?}", kind, value))
            })
    }
}

fn mismatch(id: &str, expected: &str, found: &StoredValue) -> CodecError {
    CodecError::invalid_value(
        id,
        format!("expected {}, found stored {}", expected, found.kind()),
    )
}
