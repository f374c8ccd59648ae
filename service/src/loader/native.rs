//! Loader for serialized schema models

use super::traits::{SchemaLoader, parse_document};
use status_core::prelude::*;

/// Loader for [`SchemaModel`] documents in YAML or JSON
///
/// Class, field and enum names may be omitted inside their definitions; the
/// map keys supply them.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeSchemaLoader;

impl NativeSchemaLoader {
    /// Create a new loader
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn fill_names(model: &mut SchemaModel) {
        for (class_name, class) in &mut model.classes {
            class.name.clone_from(class_name);
            for (field_name, field) in &mut class.fields {
                field.name.clone_from(field_name);
            }
        }
        for (enum_name, enum_model) in &mut model.enums {
            enum_model.name.clone_from(enum_name);
        }
    }
}

impl SchemaLoader for NativeSchemaLoader {
    fn origin(&self) -> SchemaOrigin {
        SchemaOrigin::Native
    }

    fn parse_str(&self, content: &str, location: &str) -> Result<SchemaModel> {
        let value = parse_document(content, location)?;
        let mut model: SchemaModel = serde_json::from_value(value)
            .map_err(|err| StatusError::parse_at(format!("invalid schema model: {err}"), location))?;
        Self::fill_names(&mut model);
        Ok(model)
    }
}
