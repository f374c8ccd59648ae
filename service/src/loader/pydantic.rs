//! Loader for JSON Schema documents exported from Pydantic models
//!
//! The expected input is the output of `model_json_schema()`: the root model
//! at the top level with referenced models under `$defs` (or `definitions`
//! for older exports). A document carrying only `$defs` is accepted as well.
//! Property schemas are reduced to the Python type names Pydantic started
//! from, so `{"type": "integer"}` becomes `int` and a `$ref` becomes the
//! referenced model name.

use super::traits::SchemaLoader;
use serde_json::{Map, Value};
use status_core::prelude::*;
use tracing::debug;

/// Loader for Pydantic JSON Schema documents
#[derive(Debug, Clone, Copy, Default)]
pub struct PydanticSchemaLoader;

/// A property type reduced to a type name and a multiplicity
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedType {
    name: String,
    multivalued: bool,
}

impl ResolvedType {
    fn single(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            multivalued: false,
        }
    }

    fn display_name(&self) -> String {
        if self.multivalued {
            format!("list[{}]", self.name)
        } else {
            self.name.clone()
        }
    }
}

impl PydanticSchemaLoader {
    /// Create a new loader
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build a schema model from an already parsed JSON Schema document
    ///
    /// # Errors
    ///
    /// Returns `StatusError::ParseError` if the document is not a JSON
    /// Schema object, references definitions outside the document, or uses
    /// an unknown JSON type.
    pub fn from_value(&self, document: &Value, location: &str) -> Result<SchemaModel> {
        let root = document.as_object().ok_or_else(|| {
            StatusError::parse_at("JSON Schema document must be an object", location)
        })?;

        let title = root.get("title").and_then(Value::as_str);
        let name = title.unwrap_or("pydantic").to_string();
        let mut model = SchemaModel::new(name, SchemaOrigin::Pydantic);
        model.version = Self::declared_version(root);

        if root.contains_key("properties") {
            let class_name = title.ok_or_else(|| {
                StatusError::parse_at("root model schema has no title", location)
            })?;
            model.add_class(self.class_from_definition(class_name, root, location)?);
        }

        let definitions = root
            .get("$defs")
            .or_else(|| root.get("definitions"))
            .map(|defs| {
                defs.as_object().ok_or_else(|| {
                    StatusError::parse_at("`$defs` must be an object", location)
                })
            })
            .transpose()?;

        if let Some(definitions) = definitions {
            for (def_name, definition) in definitions {
                let Some(def) = definition.as_object() else {
                    return Err(StatusError::parse_at(
                        format!("definition '{def_name}' must be an object"),
                        location,
                    ));
                };

                if let Some(values) = def.get("enum").and_then(Value::as_array) {
                    let values = values.iter().map(Self::enum_value_text);
                    model = model.with_enum(EnumModel::new(def_name.clone(), values));
                } else if def.contains_key("properties")
                    || def.get("type").and_then(Value::as_str) == Some("object")
                {
                    model.add_class(self.class_from_definition(def_name, def, location)?);
                } else {
                    debug!("Skipping non-model definition '{}' in {}", def_name, location);
                }
            }
        }

        Ok(model)
    }

    /// `version` at the top level, else the default of a root `schemaVersion` property
    fn declared_version(root: &Map<String, Value>) -> Option<String> {
        root.get("version")
            .and_then(Value::as_str)
            .or_else(|| {
                root.get("properties")
                    .and_then(|props| props.get("schemaVersion"))
                    .and_then(|prop| prop.get("default"))
                    .and_then(Value::as_str)
            })
            .map(str::to_string)
    }

    fn enum_value_text(value: &Value) -> String {
        match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }

    fn class_from_definition(
        &self,
        name: &str,
        definition: &Map<String, Value>,
        location: &str,
    ) -> Result<ClassModel> {
        let required: Vec<&str> = definition
            .get("required")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut class = ClassModel::new(name);
        class.description = definition
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string);

        let properties = match definition.get("properties") {
            None => return Ok(class),
            Some(Value::Object(props)) => props,
            Some(_) => {
                return Err(StatusError::parse_at(
                    format!("properties of '{name}' must be an object"),
                    location,
                ));
            }
        };

        for (prop_name, prop) in properties {
            let resolved = self
                .resolve(prop, location)
                .map_err(|err| match err {
                    StatusError::ParseError { message, location } => StatusError::ParseError {
                        message: format!("{name}.{prop_name}: {message}"),
                        location,
                    },
                    other => other,
                })?;
            let mut field = FieldModel::new(prop_name.clone(), resolved.name);
            field.cardinality = Cardinality {
                required: required.contains(&prop_name.as_str()),
                multivalued: resolved.multivalued,
            };
            class = class.with_field(field);
        }

        Ok(class)
    }

    fn resolve(&self, schema: &Value, location: &str) -> Result<ResolvedType> {
        let obj = match schema {
            Value::Object(obj) => obj,
            Value::Bool(true) => return Ok(ResolvedType::single("Any")),
            _ => {
                return Err(StatusError::parse_at(
                    "property schema must be an object",
                    location,
                ));
            }
        };

        if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
            return Ok(ResolvedType::single(Self::reference_name(reference, location)?));
        }

        for key in ["anyOf", "oneOf"] {
            if let Some(branches) = obj.get(key).and_then(Value::as_array) {
                return self.resolve_union(branches.iter(), location);
            }
        }

        if let Some(parts) = obj.get("allOf").and_then(Value::as_array) {
            if let [single] = parts.as_slice() {
                return self.resolve(single, location);
            }
            let names = parts
                .iter()
                .map(|part| self.resolve(part, location).map(|r| r.display_name()))
                .collect::<Result<Vec<_>>>()?;
            return Ok(ResolvedType::single(names.join(" & ")));
        }

        match obj.get("type") {
            Some(Value::String(json_type)) => self.resolve_json_type(json_type, obj, location),
            Some(Value::Array(json_types)) => {
                let branches: Vec<Value> = json_types
                    .iter()
                    .map(|t| {
                        let mut branch = obj.clone();
                        branch.insert("type".to_string(), t.clone());
                        Value::Object(branch)
                    })
                    .collect();
                self.resolve_union(branches.iter(), location)
            }
            Some(other) => Err(StatusError::parse_at(
                format!("unsupported `type` value {other}"),
                location,
            )),
            None if obj.contains_key("const") || obj.contains_key("enum") => {
                let all_strings = obj
                    .get("const")
                    .into_iter()
                    .chain(obj.get("enum").and_then(Value::as_array).into_iter().flatten())
                    .all(Value::is_string);
                Ok(ResolvedType::single(if all_strings { "str" } else { "Any" }))
            }
            None => Ok(ResolvedType::single("Any")),
        }
    }

    fn resolve_json_type(
        &self,
        json_type: &str,
        obj: &Map<String, Value>,
        location: &str,
    ) -> Result<ResolvedType> {
        let name = match json_type {
            "array" => {
                let item = match obj.get("items") {
                    Some(items) => self.resolve(items, location)?,
                    None => ResolvedType::single("Any"),
                };
                return Ok(ResolvedType {
                    name: item.display_name(),
                    multivalued: true,
                });
            }
            "string" => match obj.get("format").and_then(Value::as_str) {
                Some("date-time") => "datetime",
                Some("date") => "date",
                Some("time") => "time",
                Some("uri") => "AnyUrl",
                Some("email") => "EmailStr",
                _ => "str",
            },
            "integer" => "int",
            "number" => "float",
            "boolean" => "bool",
            "object" => "dict",
            "null" => "None",
            other => {
                return Err(StatusError::parse_at(
                    format!("unknown JSON type '{other}'"),
                    location,
                ));
            }
        };
        Ok(ResolvedType::single(name))
    }

    fn resolve_union<'a>(
        &self,
        branches: impl Iterator<Item = &'a Value>,
        location: &str,
    ) -> Result<ResolvedType> {
        let resolved = branches
            .map(|branch| self.resolve(branch, location))
            .collect::<Result<Vec<_>>>()?;
        let non_null: Vec<ResolvedType> = resolved
            .into_iter()
            .filter(|r| !(r.name == "None" && !r.multivalued))
            .collect();

        match non_null.as_slice() {
            [] => Ok(ResolvedType::single("None")),
            [only] => Ok(only.clone()),
            many if many.iter().all(|r| r.multivalued) => Ok(ResolvedType {
                name: many
                    .iter()
                    .map(|r| r.name.as_str())
                    .collect::<Vec<_>>()
                    .join(" | "),
                multivalued: true,
            }),
            many => Ok(ResolvedType::single(
                many.iter()
                    .map(ResolvedType::display_name)
                    .collect::<Vec<_>>()
                    .join(" | "),
            )),
        }
    }

    fn reference_name(reference: &str, location: &str) -> Result<String> {
        let Some(pointer) = reference.strip_prefix("#/") else {
            return Err(StatusError::parse_at(
                format!("external reference '{reference}' is not supported"),
                location,
            ));
        };
        pointer
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                StatusError::parse_at(format!("malformed reference '{reference}'"), location)
            })
    }
}

impl SchemaLoader for PydanticSchemaLoader {
    fn origin(&self) -> SchemaOrigin {
        SchemaOrigin::Pydantic
    }

    fn parse_str(&self, content: &str, location: &str) -> Result<SchemaModel> {
        let document: Value = serde_json::from_str(content)
            .map_err(|err| StatusError::parse_at(err.to_string(), location))?;
        self.from_value(&document, location)
    }
}
