//! Loader for `LinkML` schema documents
//!
//! Only the parts of a `LinkML` schema that shape a class's induced slots are
//! read: `is_a`, `mixins`, `slots`, `attributes` and `slot_usage` on classes,
//! the schema-level `slots`, `types` and `enums`, and `default_range`.
//! Imports are not followed.

use super::traits::{SchemaLoader, parse_document};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use status_core::prelude::*;
use tracing::debug;

/// Loader for `LinkML` schemas in YAML or JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkmlSchemaLoader;

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Unquoted YAML scalars such as `version: 0.6` arrive as numbers
fn scalar_as_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(text)) => Ok(Some(text)),
        Some(serde_json::Value::Number(number)) => Ok(Some(number.to_string())),
        Some(serde_json::Value::Bool(flag)) => Ok(Some(flag.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a scalar, found {other}"
        ))),
    }
}

/// Entries written as `Name:` with no body deserialize to `None`
type Definitions<T> = IndexMap<String, Option<T>>;

#[derive(Debug, Default, Deserialize)]
struct LinkmlDocument {
    #[serde(default, deserialize_with = "scalar_as_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    version: Option<String>,
    #[serde(default)]
    default_range: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    classes: Definitions<LinkmlClass>,
    #[serde(default, deserialize_with = "null_as_default")]
    slots: Definitions<LinkmlSlot>,
    #[serde(default, deserialize_with = "null_as_default")]
    types: Definitions<LinkmlType>,
    #[serde(default, deserialize_with = "null_as_default")]
    enums: Definitions<LinkmlEnum>,
}

#[derive(Debug, Default, Deserialize)]
struct LinkmlClass {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    is_a: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    mixins: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    slots: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    attributes: Definitions<LinkmlSlot>,
    #[serde(default, deserialize_with = "null_as_default")]
    slot_usage: Definitions<LinkmlSlot>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LinkmlSlot {
    #[serde(default)]
    range: Option<String>,
    #[serde(default)]
    required: Option<bool>,
    #[serde(default)]
    multivalued: Option<bool>,
    #[serde(default)]
    identifier: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    any_of: Vec<RangeExpression>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RangeExpression {
    #[serde(default)]
    range: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LinkmlType {
    #[serde(default, rename = "typeof")]
    type_of: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LinkmlEnum {
    #[serde(default, deserialize_with = "null_as_default")]
    permissible_values: Definitions<serde_json::Value>,
}

impl LinkmlSlot {
    /// Layer `usage` over this slot, keeping values `usage` leaves unset
    fn refined_by(&self, usage: &Self) -> Self {
        Self {
            range: usage.range.clone().or_else(|| self.range.clone()),
            required: usage.required.or(self.required),
            multivalued: usage.multivalued.or(self.multivalued),
            identifier: usage.identifier.or(self.identifier),
            any_of: if usage.any_of.is_empty() {
                self.any_of.clone()
            } else {
                usage.any_of.clone()
            },
        }
    }

    fn declared_range(&self) -> Option<String> {
        if let Some(range) = &self.range {
            return Some(range.clone());
        }
        let ranges: Vec<&str> = self
            .any_of
            .iter()
            .filter_map(|expr| expr.range.as_deref())
            .collect();
        (!ranges.is_empty()).then(|| ranges.join(" | "))
    }
}

/// Resolution context over one parsed document
struct Resolver<'a> {
    document: &'a LinkmlDocument,
    location: &'a str,
    empty_class: LinkmlClass,
    empty_slot: LinkmlSlot,
}

impl<'a> Resolver<'a> {
    fn new(document: &'a LinkmlDocument, location: &'a str) -> Self {
        Self {
            document,
            location,
            empty_class: LinkmlClass::default(),
            empty_slot: LinkmlSlot::default(),
        }
    }

    fn class(&self, name: &str) -> Result<&LinkmlClass> {
        match self.document.classes.get(name) {
            Some(class) => Ok(class.as_ref().unwrap_or(&self.empty_class)),
            None => Err(StatusError::parse_at(
                format!("unknown class '{name}'"),
                self.location,
            )),
        }
    }

    fn global_slot(&self, name: &str) -> Option<&LinkmlSlot> {
        self.document
            .slots
            .get(name)
            .map(|slot| slot.as_ref().unwrap_or(&self.empty_slot))
    }

    /// Induced slots of a class: ancestors first, then mixins, then its own
    fn induced_slots(
        &self,
        class_name: &str,
        visiting: &mut Vec<String>,
    ) -> Result<IndexMap<String, LinkmlSlot>> {
        if visiting.iter().any(|name| name == class_name) {
            return Err(StatusError::parse_at(
                format!(
                    "inheritance cycle: {} -> {class_name}",
                    visiting.join(" -> ")
                ),
                self.location,
            ));
        }
        let class = self.class(class_name)?;
        visiting.push(class_name.to_string());

        let mut slots = match &class.is_a {
            Some(parent) => self.induced_slots(parent, visiting)?,
            None => IndexMap::new(),
        };

        for mixin in &class.mixins {
            for (name, slot) in self.induced_slots(mixin, visiting)? {
                slots.entry(name).or_insert(slot);
            }
        }

        for slot_name in &class.slots {
            if slots.contains_key(slot_name) {
                continue;
            }
            let slot = self.global_slot(slot_name).ok_or_else(|| {
                StatusError::parse_at(
                    format!("class '{class_name}' uses unknown slot '{slot_name}'"),
                    self.location,
                )
            })?;
            slots.insert(slot_name.clone(), slot.clone());
        }

        for (name, attribute) in &class.attributes {
            slots.insert(name.clone(), attribute.clone().unwrap_or_default());
        }

        for (name, usage) in &class.slot_usage {
            let usage = usage.as_ref().unwrap_or(&self.empty_slot);
            let base = slots
                .get(name)
                .or_else(|| self.global_slot(name))
                .unwrap_or(&self.empty_slot);
            let refined = base.refined_by(usage);
            slots.insert(name.clone(), refined);
        }

        visiting.pop();
        Ok(slots)
    }

    /// Follow `typeof` from a custom type to its root
    fn resolve_range(&self, range: &str) -> Result<String> {
        let mut current = range;
        let mut seen = vec![range];
        while let Some(Some(LinkmlType {
            type_of: Some(parent),
        })) = self.document.types.get(current)
        {
            let parent = parent.as_str();
            if seen.contains(&parent) {
                return Err(StatusError::parse_at(
                    format!("`typeof` cycle through type '{parent}'"),
                    self.location,
                ));
            }
            seen.push(parent);
            current = parent;
        }
        Ok(current.to_string())
    }

    fn field(&self, name: &str, slot: &LinkmlSlot) -> Result<FieldModel> {
        let range = slot
            .declared_range()
            .or_else(|| self.document.default_range.clone())
            .unwrap_or_else(|| "string".to_string());
        let field_type = range
            .split(" | ")
            .map(|r| self.resolve_range(r))
            .collect::<Result<Vec<_>>>()?
            .join(" | ");

        let mut field = FieldModel::new(name, field_type);
        field.cardinality = Cardinality {
            required: slot.required.unwrap_or(false) || slot.identifier.unwrap_or(false),
            multivalued: slot.multivalued.unwrap_or(false),
        };
        Ok(field)
    }
}

impl LinkmlSchemaLoader {
    /// Create a new loader
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn build(document: &LinkmlDocument, location: &str) -> Result<SchemaModel> {
        let name = document.name.clone().unwrap_or_else(|| "linkml".to_string());
        let mut model = SchemaModel::new(name, SchemaOrigin::Linkml);
        model.version.clone_from(&document.version);

        let resolver = Resolver::new(document, location);
        for (class_name, class) in &document.classes {
            let mut visiting = Vec::new();
            let slots = resolver.induced_slots(class_name, &mut visiting)?;
            debug!("Class '{}' induces {} slots", class_name, slots.len());

            let mut class_model = ClassModel::new(class_name.clone());
            class_model.description = class.as_ref().and_then(|c| c.description.clone());
            for (slot_name, slot) in &slots {
                class_model = class_model.with_field(resolver.field(slot_name, slot)?);
            }
            model.add_class(class_model);
        }

        for (enum_name, definition) in &document.enums {
            let values = definition
                .as_ref()
                .map(|e| e.permissible_values.keys().cloned().collect::<Vec<_>>())
                .unwrap_or_default();
            model = model.with_enum(EnumModel::new(enum_name.clone(), values));
        }

        Ok(model)
    }
}

impl SchemaLoader for LinkmlSchemaLoader {
    fn origin(&self) -> SchemaOrigin {
        SchemaOrigin::Linkml
    }

    fn parse_str(&self, content: &str, location: &str) -> Result<SchemaModel> {
        let value = parse_document(content, location)?;
        let document: LinkmlDocument = serde_json::from_value(value)
            .map_err(|err| StatusError::parse_at(format!("invalid LinkML schema: {err}"), location))?;
        Self::build(&document, location)
    }
}
