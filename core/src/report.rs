//! Discrepancy records and status reports

use crate::types::{SchemaModel, SchemaOrigin};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of discrepancy between a source and a target schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffKind {
    /// Class present in the source only
    MissingClass,
    /// Class present in the target only
    AddedClass,
    /// Field present in the source class only
    MissingField,
    /// Field present in the target class only
    AddedField,
    /// Shared field whose types are not compatible
    TypeMismatch,
    /// Shared field whose cardinalities differ
    CardinalityMismatch,
    /// Enum present in the source only
    MissingEnum,
    /// Enum present in the target only
    AddedEnum,
    /// Permissible value present in the source enum only
    MissingPermissibleValue,
    /// Permissible value present in the target enum only
    AddedPermissibleValue,
}

impl DiffKind {
    /// All kinds in report order
    pub const ALL: [Self; 10] = [
        Self::MissingClass,
        Self::AddedClass,
        Self::MissingField,
        Self::AddedField,
        Self::TypeMismatch,
        Self::CardinalityMismatch,
        Self::MissingEnum,
        Self::AddedEnum,
        Self::MissingPermissibleValue,
        Self::AddedPermissibleValue,
    ];

    /// The kind reported when source and target swap places
    #[must_use]
    pub fn inverse(self) -> Self {
        match self {
            Self::MissingClass => Self::AddedClass,
            Self::AddedClass => Self::MissingClass,
            Self::MissingField => Self::AddedField,
            Self::AddedField => Self::MissingField,
            Self::MissingEnum => Self::AddedEnum,
            Self::AddedEnum => Self::MissingEnum,
            Self::MissingPermissibleValue => Self::AddedPermissibleValue,
            Self::AddedPermissibleValue => Self::MissingPermissibleValue,
            Self::TypeMismatch | Self::CardinalityMismatch => self,
        }
    }

    /// Stable label used in every rendering
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingClass => "missing-class",
            Self::AddedClass => "added-class",
            Self::MissingField => "missing-field",
            Self::AddedField => "added-field",
            Self::TypeMismatch => "type-mismatch",
            Self::CardinalityMismatch => "cardinality-mismatch",
            Self::MissingEnum => "missing-enum",
            Self::AddedEnum => "added-enum",
            Self::MissingPermissibleValue => "missing-permissible-value",
            Self::AddedPermissibleValue => "added-permissible-value",
        }
    }

    /// Whether the element only exists in the source schema
    #[must_use]
    pub fn is_missing(self) -> bool {
        matches!(
            self,
            Self::MissingClass
                | Self::MissingField
                | Self::MissingEnum
                | Self::MissingPermissibleValue
        )
    }

    /// Whether the element only exists in the target schema
    #[must_use]
    pub fn is_added(self) -> bool {
        matches!(
            self,
            Self::AddedClass | Self::AddedField | Self::AddedEnum | Self::AddedPermissibleValue
        )
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of a discrepancy: a class or enum, optionally one of its members
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementPath {
    /// Class or enum name
    pub element: String,

    /// Field name or permissible value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
}

impl ElementPath {
    /// Path to a whole class or enum
    #[must_use]
    pub fn element(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            member: None,
        }
    }

    /// Path to a member of a class or enum
    #[must_use]
    pub fn member(element: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            member: Some(member.into()),
        }
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.member {
            Some(member) => write!(f, "{}.{member}", self.element),
            None => f.write_str(&self.element),
        }
    }
}

/// One detected discrepancy between two schema models
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRecord {
    /// Kind of discrepancy
    pub kind: DiffKind,

    /// Where the discrepancy was found
    pub path: ElementPath,

    /// Detail on the source side (type or cardinality)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Detail on the target side (type or cardinality)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl DiffRecord {
    /// Create a record without details
    #[must_use]
    pub fn new(kind: DiffKind, path: ElementPath) -> Self {
        Self {
            kind,
            path,
            source: None,
            target: None,
        }
    }

    /// Attach source and target details
    #[must_use]
    pub fn with_details(mut self, source: Option<String>, target: Option<String>) -> Self {
        self.source = source;
        self.target = target;
        self
    }

    /// The same discrepancy seen with source and target swapped
    #[must_use]
    pub fn inverted(&self) -> Self {
        Self {
            kind: self.kind.inverse(),
            path: self.path.clone(),
            source: self.target.clone(),
            target: self.source.clone(),
        }
    }
}

impl fmt::Display for DiffRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.kind, self.path)
    }
}

/// Identity of one side of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaIdentity {
    /// Schema name
    pub name: String,
    /// Schema origin
    pub origin: SchemaOrigin,
    /// Declared version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl From<&SchemaModel> for SchemaIdentity {
    fn from(model: &SchemaModel) -> Self {
        Self {
            name: model.name.clone(),
            origin: model.origin,
            version: model.version.clone(),
        }
    }
}

/// Summary counts of a status report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total number of records
    pub total: usize,
    /// Number of classes present in both schemas
    pub classes_compared: usize,
    /// Number of records of each kind, in report order, zero counts omitted
    pub by_kind: Vec<KindCount>,
}

/// Count of records of one kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCount {
    /// Record kind
    pub kind: DiffKind,
    /// Number of records
    pub count: usize,
}

impl ReportSummary {
    fn tally(records: &[DiffRecord], classes_compared: usize) -> Self {
        let by_kind = DiffKind::ALL
            .iter()
            .map(|kind| KindCount {
                kind: *kind,
                count: records.iter().filter(|r| r.kind == *kind).count(),
            })
            .filter(|kc| kc.count > 0)
            .collect();
        Self {
            total: records.len(),
            classes_compared,
            by_kind,
        }
    }

    /// Number of records of a kind
    #[must_use]
    pub fn count(&self, kind: DiffKind) -> usize {
        self.by_kind
            .iter()
            .find(|kc| kc.kind == kind)
            .map_or(0, |kc| kc.count)
    }
}

/// Result of one comparison run
///
/// A report is immutable once built; its summary is always consistent with
/// its records. Deserializing recomputes the summary from the records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ReportParts")]
pub struct StatusReport {
    source: SchemaIdentity,
    target: SchemaIdentity,
    records: Vec<DiffRecord>,
    summary: ReportSummary,
}

/// Serialized form of a report; only `classes_compared` is taken from the
/// stored summary
#[derive(Deserialize)]
struct ReportParts {
    source: SchemaIdentity,
    target: SchemaIdentity,
    #[serde(default)]
    records: Vec<DiffRecord>,
    #[serde(default)]
    summary: ReportSummary,
}

impl From<ReportParts> for StatusReport {
    fn from(parts: ReportParts) -> Self {
        Self::new(
            parts.source,
            parts.target,
            parts.records,
            parts.summary.classes_compared,
        )
    }
}

impl StatusReport {
    /// Build a report from ordered records
    #[must_use]
    pub fn new(
        source: SchemaIdentity,
        target: SchemaIdentity,
        records: Vec<DiffRecord>,
        classes_compared: usize,
    ) -> Self {
        let summary = ReportSummary::tally(&records, classes_compared);
        Self {
            source,
            target,
            records,
            summary,
        }
    }

    /// Source schema identity
    #[must_use]
    pub fn source(&self) -> &SchemaIdentity {
        &self.source
    }

    /// Target schema identity
    #[must_use]
    pub fn target(&self) -> &SchemaIdentity {
        &self.target
    }

    /// Discrepancies in report order
    #[must_use]
    pub fn records(&self) -> &[DiffRecord] {
        &self.records
    }

    /// Summary counts
    #[must_use]
    pub fn summary(&self) -> &ReportSummary {
        &self.summary
    }

    /// Whether no discrepancy was found
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.records.is_empty()
    }

    /// Records of one kind
    pub fn records_of(&self, kind: DiffKind) -> impl Iterator<Item = &DiffRecord> {
        self.records.iter().filter(move |r| r.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn identity(name: &str, origin: SchemaOrigin) -> SchemaIdentity {
        SchemaIdentity {
            name: name.to_string(),
            origin,
            version: None,
        }
    }

    #[test]
    fn test_inverse_is_involution() {
        for kind in DiffKind::ALL {
            assert_eq!(kind.inverse().inverse(), kind);
            assert_eq!(kind.is_missing(), kind.inverse().is_added());
        }
    }

    #[test]
    fn test_record_display() {
        let record = DiffRecord::new(DiffKind::MissingField, ElementPath::member("Subject", "age"));
        assert_eq!(record.to_string(), "missing-field, Subject.age");

        let record = DiffRecord::new(DiffKind::AddedClass, ElementPath::element("Sample"));
        assert_eq!(record.to_string(), "added-class, Sample");
    }

    #[test]
    fn test_inverted_swaps_details() {
        let record = DiffRecord::new(DiffKind::TypeMismatch, ElementPath::member("Subject", "age"))
            .with_details(Some("int".into()), Some("string".into()));
        let inverted = record.inverted();
        assert_eq!(inverted.kind, DiffKind::TypeMismatch);
        assert_eq!(inverted.source.as_deref(), Some("string"));
        assert_eq!(inverted.target.as_deref(), Some("int"));
    }

    #[test]
    fn test_summary_counts() {
        let records = vec![
            DiffRecord::new(DiffKind::MissingClass, ElementPath::element("A")),
            DiffRecord::new(DiffKind::MissingField, ElementPath::member("B", "x")),
            DiffRecord::new(DiffKind::MissingField, ElementPath::member("B", "y")),
        ];
        let report = StatusReport::new(
            identity("src", SchemaOrigin::Pydantic),
            identity("tgt", SchemaOrigin::Linkml),
            records,
            1,
        );

        assert_eq!(report.summary().total, 3);
        assert_eq!(report.summary().classes_compared, 1);
        assert_eq!(report.summary().count(DiffKind::MissingField), 2);
        assert_eq!(report.summary().count(DiffKind::AddedField), 0);
        assert_eq!(report.summary().by_kind.len(), 2);
        assert_eq!(report.records_of(DiffKind::MissingClass).count(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&DiffKind::CardinalityMismatch).expect("serializes");
        assert_eq!(json, "\"cardinality-mismatch\"");
    }

    #[test]
    fn test_deserialized_summary_follows_records() {
        let json = r#"{
            "source": {"name": "Dandiset", "origin": "pydantic"},
            "target": {"name": "dandi-schema", "origin": "linkml"},
            "records": [{"kind": "added-class", "path": {"element": "Contributor"}}],
            "summary": {"total": 7, "classes_compared": 5,
                        "by_kind": [{"kind": "missing-field", "count": 7}]}
        }"#;
        let report: StatusReport = serde_json::from_str(json).expect("deserializes");

        assert_eq!(report.summary().total, 1);
        assert_eq!(report.summary().classes_compared, 5);
        assert_eq!(report.summary().count(DiffKind::AddedClass), 1);
        assert_eq!(report.summary().count(DiffKind::MissingField), 0);
    }
}
