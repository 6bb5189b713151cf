//! Field metadata types
//!
//! Supported data types:
//! - identifier: UUID stored as its string form
//! - boolean: stored as 0 / 1
//! - integer, long, double, float: stored numerics
//! - date: stored as epoch milliseconds
//! - string, path, string_constructible: stored as text
//! - enumeration: stored as code or name, depending on the enum kind
//! - language_text, summary: one stored sub-field per language

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{RegistryError, RegistryResult};

/// Identifier of one logical field
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for FieldId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for FieldId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared data type of a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataType {
    Identifier,
    Boolean,
    Integer,
    Long,
    Double,
    Float,
    Date,
    String,
    Path,
    /// Any type constructible from its string form
    StringConstructible { type_name: String },
    Enumeration { kind: String },
    /// Free text keyed by language
    LanguageText,
    /// Short summary text keyed by language
    Summary,
}

impl DataType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &str {
        match self {
            DataType::Identifier => "identifier",
            DataType::Boolean => "boolean",
            DataType::Integer => "integer",
            DataType::Long => "long",
            DataType::Double => "double",
            DataType::Float => "float",
            DataType::Date => "date",
            DataType::String => "string",
            DataType::Path => "path",
            DataType::StringConstructible { type_name } => type_name,
            DataType::Enumeration { kind } => kind,
            DataType::LanguageText => "language_text",
            DataType::Summary => "summary",
        }
    }

    /// Types a range field may be declared with
    pub fn is_comparable(&self) -> bool {
        matches!(
            self,
            DataType::Integer
                | DataType::Long
                | DataType::Double
                | DataType::Float
                | DataType::Date
                | DataType::String
        )
    }

    /// Types stored as one sub-field per language
    pub fn is_language_keyed(&self) -> bool {
        matches!(self, DataType::LanguageText | DataType::Summary)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

fn default_true() -> bool {
    true
}

/// Metadata for one logical field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Logical field identifier
    pub id: FieldId,
    /// Declared data type (component type for collections)
    pub data_type: DataType,
    #[serde(default)]
    pub collection: bool,
    #[serde(default)]
    pub boolean: bool,
    /// Concrete type depends on the model type declaring the field
    #[serde(default)]
    pub polymorphic: bool,
    /// Stored once per language (language text or summary)
    #[serde(default)]
    pub language_keyed: bool,
    /// Stored as a lower and an upper bound
    #[serde(default)]
    pub range: bool,
    /// Relational column name; defaults to the field id
    #[serde(default)]
    pub column: Option<String>,
    /// False when the relational backend does not store this field
    #[serde(default = "default_true")]
    pub relational: bool,
}

impl FieldMetadata {
    /// Creates a plain scalar field
    pub fn scalar(id: impl Into<FieldId>, data_type: DataType) -> Self {
        let boolean = data_type == DataType::Boolean;
        let language_keyed = data_type.is_language_keyed();
        Self {
            id: id.into(),
            data_type,
            collection: false,
            boolean,
            polymorphic: false,
            language_keyed,
            range: false,
            column: None,
            relational: true,
        }
    }

    /// Creates a collection field with the given component type
    pub fn collection(id: impl Into<FieldId>, component: DataType) -> Self {
        Self {
            collection: true,
            ..Self::scalar(id, component)
        }
    }

    /// Creates a range field over a comparable type
    pub fn range(id: impl Into<FieldId>, bound_type: DataType) -> Self {
        Self {
            range: true,
            ..Self::scalar(id, bound_type)
        }
    }

    /// Marks the field polymorphic
    pub fn polymorphic(mut self) -> Self {
        self.polymorphic = true;
        self
    }

    /// Overrides the relational column name
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Marks the field as absent from the relational backend
    pub fn index_only(mut self) -> Self {
        self.relational = false;
        self
    }

    /// Stored once per language
    pub fn is_language_keyed(&self) -> bool {
        self.language_keyed || self.data_type.is_language_keyed()
    }

    /// Relational column holding this field
    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or(self.id.as_str())
    }

    /// Checks flag consistency for one field of `model_type`
    pub(crate) fn validate(&self, model_type: &str) -> RegistryResult<()> {
        let invalid = |reason: &str| RegistryError::invalid_field(model_type, self.id.as_str(), reason);

        if self.id.as_str().is_empty() {
            return Err(invalid("field id must not be empty"));
        }
        if self.id.as_str().contains('.') {
            return Err(invalid("field id must not contain '.'"));
        }
        if self.range && (self.collection || self.is_language_keyed()) {
            return Err(invalid("range fields cannot be collections or language keyed"));
        }
        if self.range && !self.data_type.is_comparable() {
            return Err(invalid("range fields need a comparable data type"));
        }
        if self.language_keyed && !self.data_type.is_language_keyed() {
            return Err(invalid(
                "language keyed fields must be declared language_text or summary",
            ));
        }
        if self.boolean && self.data_type != DataType::Boolean {
            return Err(invalid("boolean flag needs the boolean data type"));
        }
        Ok(())
    }
}

/// One variant of an enumeration kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumVariant {
    pub name: String,
    #[serde(default)]
    pub code: Option<i64>,
}

/// An enumeration kind. Coded kinds store the numeric code, the others
/// store the variant name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumKind {
    pub name: String,
    #[serde(default)]
    pub coded: bool,
    pub variants: Vec<EnumVariant>,
}

impl EnumKind {
    /// Creates an enum kind stored by variant name
    pub fn named(name: impl Into<String>, variants: &[&str]) -> Self {
        Self {
            name: name.into(),
            coded: false,
            variants: variants
                .iter()
                .map(|v| EnumVariant {
                    name: (*v).to_string(),
                    code: None,
                })
                .collect(),
        }
    }

    /// Creates an enum kind stored by numeric code
    pub fn coded(name: impl Into<String>, variants: &[(&str, i64)]) -> Self {
        Self {
            name: name.into(),
            coded: true,
            variants: variants
                .iter()
                .map(|(v, code)| EnumVariant {
                    name: (*v).to_string(),
                    code: Some(*code),
                })
                .collect(),
        }
    }

    pub fn variant_by_name(&self, name: &str) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    pub fn variant_by_code(&self, code: i64) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.code == Some(code))
    }

    pub(crate) fn validate(&self) -> RegistryResult<()> {
        if self.coded && self.variants.iter().any(|v| v.code.is_none()) {
            return Err(RegistryError::invalid_field(
                &self.name,
                "<variants>",
                "every variant of a coded enum needs a code",
            ));
        }
        Ok(())
    }
}

/// Serialized form of one model type, as read from a registry file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// Model type name
    pub name: String,
    /// Numeric code stored in every indexed document of this type
    pub type_code: u32,
    /// Relational entity name; defaults to the model type name
    #[serde(default)]
    pub entity: Option<String>,
    pub fields: Vec<FieldMetadata>,
    /// Concrete data type of each polymorphic field in this model type
    #[serde(default)]
    pub polymorphic: HashMap<FieldId, DataType>,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>, type_code: u32) -> Self {
        Self {
            name: name.into(),
            type_code,
            entity: None,
            fields: Vec::new(),
            polymorphic: HashMap::new(),
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_field(mut self, field: FieldMetadata) -> Self {
        self.fields.push(field);
        self
    }

    /// Declares the concrete type of a polymorphic field for this model type
    pub fn resolving(mut self, field: impl Into<FieldId>, data_type: DataType) -> Self {
        self.polymorphic.insert(field.into(), data_type);
        self
    }
}

/// Immutable metadata for one model type
#[derive(Debug, Clone)]
pub struct TypeMetadata {
    name: String,
    type_code: u32,
    entity: String,
    fields: Vec<FieldMetadata>,
    by_id: HashMap<FieldId, usize>,
    polymorphic: HashMap<FieldId, DataType>,
}

impl TypeMetadata {
    /// Builds metadata from a definition, validating every field
    pub(crate) fn from_definition(def: TypeDefinition) -> RegistryResult<Self> {
        let mut by_id = HashMap::with_capacity(def.fields.len());
        for (pos, field) in def.fields.iter().enumerate() {
            field.validate(&def.name)?;
            if by_id.insert(field.id.clone(), pos).is_some() {
                return Err(RegistryError::duplicate_field(&def.name, field.id.as_str()));
            }
            if field.polymorphic && !def.polymorphic.contains_key(&field.id) {
                return Err(RegistryError::unresolved_polymorphic(
                    &def.name,
                    field.id.as_str(),
                ));
            }
        }

        Ok(Self {
            entity: def.entity.unwrap_or_else(|| def.name.clone()),
            name: def.name,
            type_code: def.type_code,
            fields: def.fields,
            by_id,
            polymorphic: def.polymorphic,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_code(&self) -> u32 {
        self.type_code
    }

    /// Relational entity name
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Looks up one field's metadata
    pub fn field(&self, id: &str) -> Option<&FieldMetadata> {
        self.by_id.get(id).map(|&pos| &self.fields[pos])
    }

    /// All fields in declaration order
    pub fn fields(&self) -> &[FieldMetadata] {
        &self.fields
    }

    /// Data type values of `field` decode to in this model type.
    ///
    /// Polymorphic fields take the type this model type declares for them.
    pub fn value_type<'a>(&'a self, field: &'a FieldMetadata) -> &'a DataType {
        if field.polymorphic {
            if let Some(resolved) = self.polymorphic.get(&field.id) {
                return resolved;
            }
        }
        &field.data_type
    }

    /// Enum kinds referenced by this type's fields
    pub(crate) fn enum_kinds(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .map(|f| self.value_type(f))
            .filter_map(|t| match t {
                DataType::Enumeration { kind } => Some(kind.as_str()),
                _ => None,
            })
    }
}
