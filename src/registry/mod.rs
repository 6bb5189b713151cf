//! Field Metadata Registry
//!
//! Per model type, maps every field id to its kind and declared data type,
//! and maps the numeric type code stored in indexed documents back to the
//! model type. Built once at startup, immutable afterwards; the compiler and
//! the codec receive it by reference.

mod errors;
mod loader;
mod registry;
mod types;

pub use errors::{RegistryError, RegistryErrorCode, RegistryResult};
pub use loader::RegistryLoader;
pub use registry::{is_well_formed_language, FieldRegistry, RegistryBuilder, DEFAULT_LANGUAGES};
pub use types::{
    DataType, EnumKind, EnumVariant, FieldId, FieldMetadata, TypeDefinition, TypeMetadata,
};
