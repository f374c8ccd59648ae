//! Schema diff engine
//!
//! Compares two [`SchemaModel`]s element by element and reports every
//! discrepancy as a [`DiffRecord`]. Records come out in a fixed order:
//! classes by name (the class-level record before its field records, fields
//! by name, type mismatches before cardinality mismatches), then enums by
//! name with permissible values by value.

use super::version::check_versions;
use serde::{Deserialize, Serialize};
use status_core::prelude::*;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Options for schema diffing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOptions {
    /// Type names treated as the same type
    pub equivalence: TypeEquivalence,

    /// Report shared fields whose cardinality differs
    pub compare_cardinality: bool,

    /// Compare enums and their permissible values
    pub compare_enums: bool,

    /// Fail on incompatible declared versions instead of warning
    pub require_compatible_versions: bool,

    /// Classes never reported or compared
    pub ignore_classes: BTreeSet<String>,

    /// Fields never reported, as `Class.field`
    pub ignore_fields: BTreeSet<String>,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            equivalence: TypeEquivalence::exact(),
            compare_cardinality: true,
            compare_enums: true,
            require_compatible_versions: true,
            ignore_classes: BTreeSet::new(),
            ignore_fields: BTreeSet::new(),
        }
    }
}

impl DiffOptions {
    /// Use an equivalence table
    #[must_use]
    pub fn with_equivalence(mut self, equivalence: TypeEquivalence) -> Self {
        self.equivalence = equivalence;
        self
    }

    /// Skip a class
    #[must_use]
    pub fn ignore_class(mut self, class: impl Into<String>) -> Self {
        self.ignore_classes.insert(class.into());
        self
    }

    /// Skip a field of a class
    #[must_use]
    pub fn ignore_field(mut self, class: &str, field: &str) -> Self {
        self.ignore_fields.insert(format!("{class}.{field}"));
        self
    }

    fn field_ignored(&self, class: &str, field: &str) -> bool {
        self.ignore_fields.contains(&format!("{class}.{field}"))
    }
}

/// Schema diff engine
#[derive(Debug, Clone, Default)]
pub struct SchemaDiff {
    options: DiffOptions,
}

impl SchemaDiff {
    /// Create new schema diff engine
    #[must_use]
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    /// Options in effect
    #[must_use]
    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Compare a source schema with a target schema
    ///
    /// # Errors
    ///
    /// Returns `StatusError::ComparisonError` if the declared versions are
    /// incompatible and `StatusError::ParseError` if a declared version
    /// cannot be parsed.
    pub fn diff(&self, source: &SchemaModel, target: &SchemaModel) -> Result<StatusReport> {
        match check_versions(source.version.as_deref(), target.version.as_deref()) {
            Err(err) if err.is_comparison_error() && !self.options.require_compatible_versions => {
                warn!("{err}; comparing anyway");
            }
            other => other?,
        }

        let mut records = Vec::new();
        let classes_compared = self.compare_classes(source, target, &mut records);
        if self.options.compare_enums {
            Self::compare_enums(source, target, &mut records);
        }

        debug!(
            "Compared '{}' with '{}': {} records over {} shared classes",
            source.name,
            target.name,
            records.len(),
            classes_compared
        );
        Ok(StatusReport::new(
            source.into(),
            target.into(),
            records,
            classes_compared,
        ))
    }

    /// Compare classes, returning the number present in both schemas
    fn compare_classes(
        &self,
        source: &SchemaModel,
        target: &SchemaModel,
        records: &mut Vec<DiffRecord>,
    ) -> usize {
        let names: BTreeSet<&str> = source
            .classes
            .keys()
            .chain(target.classes.keys())
            .map(String::as_str)
            .filter(|name| !self.options.ignore_classes.contains(*name))
            .collect();

        let mut compared = 0;
        for name in names {
            match (source.classes.get(name), target.classes.get(name)) {
                (Some(_), None) => {
                    records.push(DiffRecord::new(DiffKind::MissingClass, ElementPath::element(name)));
                }
                (None, Some(_)) => {
                    records.push(DiffRecord::new(DiffKind::AddedClass, ElementPath::element(name)));
                }
                (Some(source_class), Some(target_class)) => {
                    compared += 1;
                    self.compare_class(source_class, target_class, records);
                }
                (None, None) => {}
            }
        }
        compared
    }

    fn compare_class(&self, source: &ClassModel, target: &ClassModel, records: &mut Vec<DiffRecord>) {
        let class = source.name.as_str();
        let fields: BTreeSet<&str> = source
            .fields
            .keys()
            .chain(target.fields.keys())
            .map(String::as_str)
            .filter(|field| !self.options.field_ignored(class, field))
            .collect();

        for field in fields {
            let path = ElementPath::member(class, field);
            match (source.fields.get(field), target.fields.get(field)) {
                (Some(s), None) => records.push(
                    DiffRecord::new(DiffKind::MissingField, path)
                        .with_details(Some(s.field_type.clone()), None),
                ),
                (None, Some(t)) => records.push(
                    DiffRecord::new(DiffKind::AddedField, path)
                        .with_details(None, Some(t.field_type.clone())),
                ),
                (Some(s), Some(t)) => {
                    if !self.options.equivalence.compatible(&s.field_type, &t.field_type) {
                        debug!(
                            "{}: '{}' is not compatible with '{}'",
                            path, s.field_type, t.field_type
                        );
                        records.push(
                            DiffRecord::new(DiffKind::TypeMismatch, path.clone()).with_details(
                                Some(s.field_type.clone()),
                                Some(t.field_type.clone()),
                            ),
                        );
                    }
                    if self.options.compare_cardinality && s.cardinality != t.cardinality {
                        records.push(
                            DiffRecord::new(DiffKind::CardinalityMismatch, path).with_details(
                                Some(s.cardinality.to_string()),
                                Some(t.cardinality.to_string()),
                            ),
                        );
                    }
                }
                (None, None) => {}
            }
        }
    }

    fn compare_enums(source: &SchemaModel, target: &SchemaModel, records: &mut Vec<DiffRecord>) {
        let names: BTreeSet<&str> = source
            .enums
            .keys()
            .chain(target.enums.keys())
            .map(String::as_str)
            .collect();

        for name in names {
            match (source.enums.get(name), target.enums.get(name)) {
                (Some(_), None) => {
                    records.push(DiffRecord::new(DiffKind::MissingEnum, ElementPath::element(name)));
                }
                (None, Some(_)) => {
                    records.push(DiffRecord::new(DiffKind::AddedEnum, ElementPath::element(name)));
                }
                (Some(s), Some(t)) => {
                    let source_values: BTreeSet<&str> =
                        s.permissible_values.iter().map(String::as_str).collect();
                    let target_values: BTreeSet<&str> =
                        t.permissible_values.iter().map(String::as_str).collect();
                    for value in source_values.union(&target_values) {
                        let kind = match (source_values.contains(value), target_values.contains(value)) {
                            (true, false) => DiffKind::MissingPermissibleValue,
                            (false, true) => DiffKind::AddedPermissibleValue,
                            _ => continue,
                        };
                        records.push(DiffRecord::new(kind, ElementPath::member(name, *value)));
                    }
                }
                (None, None) => {}
            }
        }
    }
}
