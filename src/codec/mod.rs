//! Document codec for crossquery
//!
//! Materializes typed field values from index documents, and writes them
//! back in the same physical layout:
//! - Collections: one physical field per element, same name
//! - Language keyed text: `<field>.<language>`
//! - Ranges: `<field>.lower` and `<field>.upper`
//! - Everything else: one physical field under the field id
//!
//! The model type of a document comes from its `_type` field.

mod decoder;
mod document;
mod encoder;
mod errors;
mod key;
mod value;

pub use decoder::{DecodedDocument, DocumentDecoder, TYPE_CODE_FIELD};
pub use document::{IndexedDocument, StoredField, StoredValue};
pub use encoder::DocumentEncoder;
pub use errors::{CodecError, CodecErrorCode, CodecResult};
pub use key::{Dimension, PhysicalKey, LOWER_TOKEN, UPPER_TOKEN};
pub use value::{Materialized, MaterializedValue, TypedValue};
