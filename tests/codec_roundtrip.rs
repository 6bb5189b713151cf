//! Codec Tests
//!
//! Decoding and encoding stored index documents against a registry read
//! from disk:
//! - Stored primitives become typed values
//! - Shape rules hold (range, collection, language-keyed)
//! - Decoding what the encoder wrote gives the same values back

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use crossquery::codec::{
    DocumentDecoder, DocumentEncoder, IndexedDocument, MaterializedValue, StoredValue,
    TypedValue, TYPE_CODE_FIELD,
};
use crossquery::registry::{DataType, FieldId, FieldRegistry, RegistryLoader};
use crossquery::Severity;
use serde_json::json;
use tempfile::TempDir;
use uuid::Uuid;

// =============================================================================
// Helper Functions
// =============================================================================

fn write(dir: &Path, name: &str, value: serde_json::Value) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, value.to_string()).unwrap();
}

fn load_registry() -> (TempDir, FieldRegistry) {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "languages.json", json!(["en", "fr"]));
    write(
        tmp.path(),
        "enums.json",
        json!([
            {"name": "Priority", "coded": true, "variants": [
                {"name": "LOW", "code": 1},
                {"name": "HIGH", "code": 9}
            ]},
            {"name": "Color", "variants": [{"name": "RED"}, {"name": "GREEN"}]}
        ]),
    );
    write(
        tmp.path(),
        "types/product.json",
        json!({
            "name": "Product",
            "type_code": 7,
            "fields": [
                {"id": "oid", "data_type": {"type": "identifier"}},
                {"id": "available", "data_type": {"type": "boolean"}},
                {"id": "createDate", "data_type": {"type": "date"}},
                {"id": "priority", "data_type": {"type": "enumeration", "kind": "Priority"}},
                {"id": "tags", "data_type": {"type": "string"}, "collection": true},
                {"id": "title", "data_type": {"type": "language_text"}},
                {"id": "validity", "data_type": {"type": "date"}, "range": true},
                {"id": "stock", "data_type": {"type": "integer"}},
                {"id": "serial", "data_type": {"type": "long"}},
                {"id": "price", "data_type": {"type": "double"}},
                {"id": "weight", "data_type": {"type": "float"}},
                {"id": "manual", "data_type": {"type": "path"}},
                {"id": "homepage", "data_type": {"type": "string_constructible", "type_name": "Url"}},
                {"id": "sku", "data_type": {"type": "string"}},
                {"id": "color", "data_type": {"type": "enumeration", "kind": "Color"}}
            ]
        }),
    );

    let registry = RegistryLoader::new(tmp.path()).load().unwrap();
    (tmp, registry)
}

fn millis(ms: i64) -> TypedValue {
    TypedValue::Date(Utc.timestamp_millis_opt(ms).unwrap())
}

// =============================================================================
// Decoding
// =============================================================================

#[test]
fn test_decode_primitives() {
    let (_tmp, registry) = load_registry();
    let document = IndexedDocument::new()
        .with(TYPE_CODE_FIELD, StoredValue::text("7"))
        .with("available", StoredValue::Long(1))
        .with("createDate", StoredValue::Long(1_700_000_000_000))
        .with("priority", StoredValue::Long(1))
        .with("stock", StoredValue::Long(12));

    let decoded = DocumentDecoder::new(&registry).decode(&document).unwrap();
    assert_eq!(decoded.model_type, "Product");
    assert_eq!(decoded.type_code, 7);
    assert_eq!(
        decoded.get("available").unwrap().as_single(),
        Some(&TypedValue::Boolean(true))
    );
    assert_eq!(
        decoded.get("createDate").unwrap().as_single(),
        Some(&millis(1_700_000_000_000))
    );
    assert_eq!(
        decoded.get("priority").unwrap().as_single(),
        Some(&TypedValue::enumeration("Priority", "LOW"))
    );
    assert_eq!(
        decoded.get("stock").unwrap().as_single(),
        Some(&TypedValue::Integer(12))
    );
    assert!(decoded.get("tags").is_none());
}

#[test]
fn test_decode_shapes() {
    let (_tmp, registry) = load_registry();
    let document = IndexedDocument::new()
        .with(TYPE_CODE_FIELD, StoredValue::Long(7))
        .with("tags", StoredValue::text("red"))
        .with("title.en", StoredValue::text("Lamp"))
        .with("tags", StoredValue::text("blue"))
        .with("validity.lower", StoredValue::Long(10))
        .with("title.fr", StoredValue::text("Lampe"))
        .with("validity.upper", StoredValue::Long(20));

    let decoded = DocumentDecoder::new(&registry).decode(&document).unwrap();
    assert_eq!(
        decoded.get("tags").unwrap().as_sequence(),
        Some(&[TypedValue::Text("red".into()), TypedValue::Text("blue".into())][..])
    );
    assert_eq!(
        decoded.get("validity").unwrap().as_single(),
        Some(&TypedValue::range(millis(10), millis(20)))
    );

    let mut titles = BTreeMap::new();
    titles.insert("en".to_string(), "Lamp".to_string());
    titles.insert("fr".to_string(), "Lampe".to_string());
    assert_eq!(
        decoded.get("title").unwrap().as_single(),
        Some(&TypedValue::LanguageText(titles))
    );
}

#[test]
fn test_range_field_stored_plain() {
    let (_tmp, registry) = load_registry();
    let document = IndexedDocument::new()
        .with(TYPE_CODE_FIELD, StoredValue::Long(7))
        .with("validity", StoredValue::Long(42));

    let decoded = DocumentDecoder::new(&registry).decode(&document).unwrap();
    assert_eq!(decoded.get("validity").unwrap().as_single(), Some(&millis(42)));
}

#[test]
fn test_decode_failures_are_fatal() {
    let (_tmp, registry) = load_registry();
    let decoder = DocumentDecoder::new(&registry);

    let no_code = IndexedDocument::new().with("stock", StoredValue::Long(1));
    assert_eq!(
        decoder.decode(&no_code).unwrap_err().code().code(),
        "CQ_CODEC_MISSING_TYPE_CODE"
    );

    let unknown = IndexedDocument::new().with(TYPE_CODE_FIELD, StoredValue::Long(99));
    assert_eq!(
        decoder.decode(&unknown).unwrap_err().code().code(),
        "CQ_CODEC_UNKNOWN_TYPE_CODE"
    );

    let half_range = IndexedDocument::new()
        .with(TYPE_CODE_FIELD, StoredValue::Long(7))
        .with("validity.lower", StoredValue::Long(10));
    let err = decoder.decode(&half_range).unwrap_err();
    assert_eq!(err.severity(), Severity::Fatal);
}

// =============================================================================
// Encoding
// =============================================================================

#[test]
fn test_encode_then_decode_gives_same_values() {
    let (_tmp, registry) = load_registry();
    let mut fields = BTreeMap::new();
    fields.insert(
        FieldId::from("oid"),
        MaterializedValue::single(DataType::Identifier, TypedValue::Identifier(Uuid::new_v4())),
    );
    fields.insert(
        FieldId::from("available"),
        MaterializedValue::single(DataType::Boolean, TypedValue::Boolean(false)),
    );
    fields.insert(
        FieldId::from("priority"),
        MaterializedValue::single(
            DataType::Enumeration {
                kind: "Priority".into(),
            },
            TypedValue::enumeration("Priority", "HIGH"),
        ),
    );
    fields.insert(
        FieldId::from("createDate"),
        MaterializedValue::single(DataType::Date, millis(1_700_000_000_000)),
    );
    fields.insert(
        FieldId::from("stock"),
        MaterializedValue::single(DataType::Integer, TypedValue::Integer(-3)),
    );
    fields.insert(
        FieldId::from("serial"),
        MaterializedValue::single(DataType::Long, TypedValue::Long(9_007_199_254_740_993)),
    );
    fields.insert(
        FieldId::from("price"),
        MaterializedValue::single(DataType::Double, TypedValue::Double(19.99)),
    );
    fields.insert(
        FieldId::from("weight"),
        MaterializedValue::single(DataType::Float, TypedValue::Float(1.5)),
    );
    fields.insert(
        FieldId::from("manual"),
        MaterializedValue::single(DataType::Path, TypedValue::Path(PathBuf::from("/docs/lamp.pdf"))),
    );
    fields.insert(
        FieldId::from("homepage"),
        MaterializedValue::single(
            DataType::StringConstructible {
                type_name: "Url".into(),
            },
            TypedValue::StringConstructible {
                type_name: "Url".into(),
                text: "https://example.com/lamp".into(),
            },
        ),
    );
    fields.insert(
        FieldId::from("sku"),
        MaterializedValue::single(DataType::String, TypedValue::Text("LMP-01".into())),
    );
    fields.insert(
        FieldId::from("color"),
        MaterializedValue::single(
            DataType::Enumeration {
                kind: "Color".into(),
            },
            TypedValue::enumeration("Color", "GREEN"),
        ),
    );
    fields.insert(
        FieldId::from("tags"),
        MaterializedValue::sequence(
            DataType::String,
            vec![TypedValue::Text("x".into()), TypedValue::Text("y".into())],
        ),
    );
    fields.insert(
        FieldId::from("validity"),
        MaterializedValue::single(DataType::Date, TypedValue::range(millis(1), millis(2))),
    );

    let encoder = DocumentEncoder::new(&registry);
    let document = encoder.encode("Product", &fields).unwrap();
    assert_eq!(document.get(TYPE_CODE_FIELD), Some(&StoredValue::Long(7)));
    assert_eq!(document.get("priority"), Some(&StoredValue::Long(9)));
    assert_eq!(document.get("available"), Some(&StoredValue::Long(0)));
    assert_eq!(document.get("color"), Some(&StoredValue::text("GREEN")));
    assert_eq!(document.get("weight"), Some(&StoredValue::Double(1.5)));

    let decoded = DocumentDecoder::new(&registry).decode(&document).unwrap();
    assert_eq!(decoded.fields, fields);
}
