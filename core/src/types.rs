//! Schema model types shared by the loaders and the diff engine

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a [`SchemaModel`] was resolved from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaOrigin {
    /// JSON Schema exported from Pydantic models
    Pydantic,
    /// A `LinkML` schema document
    Linkml,
    /// A serialized [`SchemaModel`]
    #[default]
    Native,
}

impl fmt::Display for SchemaOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pydantic => write!(f, "pydantic"),
            Self::Linkml => write!(f, "linkml"),
            Self::Native => write!(f, "native"),
        }
    }
}

/// A named collection of class and enum definitions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaModel {
    /// Name of the schema
    pub name: String,

    /// Version declared by the schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Origin of the schema
    #[serde(default)]
    pub origin: SchemaOrigin,

    /// Class definitions
    #[serde(default)]
    pub classes: IndexMap<String, ClassModel>,

    /// Enum definitions
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub enums: IndexMap<String, EnumModel>,
}

impl SchemaModel {
    /// Create an empty schema model
    #[must_use]
    pub fn new(name: impl Into<String>, origin: SchemaOrigin) -> Self {
        Self {
            name: name.into(),
            origin,
            ..Self::default()
        }
    }

    /// Set the declared version
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Add a class, replacing any class of the same name
    #[must_use]
    pub fn with_class(mut self, class: ClassModel) -> Self {
        self.add_class(class);
        self
    }

    /// Add an enum, replacing any enum of the same name
    #[must_use]
    pub fn with_enum(mut self, enum_model: EnumModel) -> Self {
        self.enums.insert(enum_model.name.clone(), enum_model);
        self
    }

    /// Add a class, replacing any class of the same name
    pub fn add_class(&mut self, class: ClassModel) {
        self.classes.insert(class.name.clone(), class);
    }

    /// Look up a field by class and field name
    #[must_use]
    pub fn field(&self, class: &str, field: &str) -> Option<&FieldModel> {
        self.classes.get(class).and_then(|c| c.fields.get(field))
    }

    /// Total number of fields across all classes
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.classes.values().map(|c| c.fields.len()).sum()
    }
}

/// A class and its fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassModel {
    /// Name of the class
    #[serde(default)]
    pub name: String,

    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Fields of the class, including inherited ones
    #[serde(default)]
    pub fields: IndexMap<String, FieldModel>,
}

impl ClassModel {
    /// Create a class with no fields
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a field, replacing any field of the same name
    #[must_use]
    pub fn with_field(mut self, field: FieldModel) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }
}

/// A field (slot) of a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldModel {
    /// Name of the field
    #[serde(default)]
    pub name: String,

    /// Declared type name
    #[serde(rename = "type")]
    pub field_type: String,

    /// Cardinality of the field
    #[serde(default)]
    pub cardinality: Cardinality,
}

impl FieldModel {
    /// Create an optional single-valued field
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            cardinality: Cardinality::default(),
        }
    }

    /// Mark the field as required
    #[must_use]
    pub fn required(mut self) -> Self {
        self.cardinality.required = true;
        self
    }

    /// Mark the field as multivalued
    #[must_use]
    pub fn multivalued(mut self) -> Self {
        self.cardinality.multivalued = true;
        self
    }
}

/// How many values a field holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cardinality {
    /// At least one value must be present
    #[serde(default)]
    pub required: bool,

    /// More than one value may be present
    #[serde(default)]
    pub multivalued: bool,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match (self.required, self.multivalued) {
            (true, false) => "1",
            (false, false) => "0..1",
            (true, true) => "1..*",
            (false, true) => "0..*",
        };
        f.write_str(text)
    }
}

/// An enumeration and its permissible values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumModel {
    /// Name of the enum
    #[serde(default)]
    pub name: String,

    /// Permissible values in declaration order
    #[serde(default)]
    pub permissible_values: Vec<String>,
}

impl EnumModel {
    /// Create an enum with the given values
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            permissible_values: values.into_iter().map(Into::into).collect(),
        }
    }
}
