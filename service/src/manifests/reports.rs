//! Validation reports on dandiset manifests

use crate::validation::{LocItem, PydanticValidationErr};
use serde::{Deserialize, Serialize};
use status_core::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;

/// Reports subdirectory written by the `manifests` command
pub const MANIFESTS_SUBDIR: &str = "manifests";

/// File holding the dandiset validation reports
pub const DANDISET_REPORTS_FILE: &str = "dandiset_validation_reports.json";

/// File holding the asset validation reports
pub const ASSET_REPORTS_FILE: &str = "asset_validation_reports.json";

/// One JSON Schema validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonschemaValidationErr {
    /// Human readable message
    pub message: String,
    /// Location of the offending value in the instance
    pub absolute_path: Vec<LocItem>,
    /// Location of the failing keyword in the schema
    pub absolute_schema_path: Vec<LocItem>,
}

impl JsonschemaValidationErr {
    /// Build an error from JSON Pointers into the instance and the schema
    #[must_use]
    pub fn from_pointers(message: String, instance_path: &str, schema_path: &str) -> Self {
        Self {
            message,
            absolute_path: pointer_items(instance_path),
            absolute_schema_path: pointer_items(schema_path),
        }
    }

    /// The schema keyword that failed, such as `required` or `format`
    #[must_use]
    pub fn keyword(&self) -> &str {
        self.absolute_schema_path
            .iter()
            .rev()
            .find_map(|item| match item {
                LocItem::Key(key) => Some(key.as_str()),
                LocItem::Index(_) => None,
            })
            .unwrap_or("schema")
    }

    /// The error in the `type`/`msg`/`loc` shape the error tables count
    #[must_use]
    pub fn to_err(&self) -> PydanticValidationErr {
        PydanticValidationErr {
            err_type: self.keyword().to_string(),
            msg: self.message.clone(),
            loc: self.absolute_path.clone(),
        }
    }
}

/// Split a JSON Pointer into location items; numeric segments become indices
fn pointer_items(pointer: &str) -> Vec<LocItem> {
    pointer
        .split('/')
        .skip(1)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let segment = segment.replace("~1", "/").replace("~0", "~");
            match segment.parse::<i64>() {
                Ok(index) => LocItem::Index(index),
                Err(_) => LocItem::Key(segment),
            }
        })
        .collect()
}

/// Validation report on the dandiset metadata of one dandiset version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DandisetValidationReport {
    /// Dandiset identifier, such as `000003`
    pub dandiset_identifier: String,
    /// `draft` or a published version
    pub dandiset_version: String,
    /// Errors against the dandiset JSON Schema
    #[serde(default)]
    pub jsonschema_validation_errs: Vec<JsonschemaValidationErr>,
}

/// Validation report on one asset of a dandiset version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetValidationReport {
    /// Dandiset identifier
    pub dandiset_identifier: String,
    /// `draft` or a published version
    pub dandiset_version: String,
    /// The asset's `id`, if it has one
    pub asset_id: Option<String>,
    /// The asset's `path`, if it has one
    pub asset_path: Option<String>,
    /// Position of the asset in the assets file
    pub asset_idx: usize,
    /// Errors against the asset JSON Schema
    #[serde(default)]
    pub jsonschema_validation_errs: Vec<JsonschemaValidationErr>,
}

/// Dandiset reports keyed by dandiset identifier, then version
pub type DandisetValidationReports = BTreeMap<String, BTreeMap<String, DandisetValidationReport>>;

/// Asset reports keyed by dandiset identifier, then version
pub type AssetValidationReports = BTreeMap<String, BTreeMap<String, Vec<AssetValidationReport>>>;

/// Reports on all metadata that failed validation in a manifest tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestReports {
    /// Failing dandiset metadata
    pub dandisets: DandisetValidationReports,
    /// Failing asset metadata
    pub assets: AssetValidationReports,
}

impl ManifestReports {
    /// Number of failing dandiset versions
    #[must_use]
    pub fn dandiset_count(&self) -> usize {
        self.dandisets.values().map(BTreeMap::len).sum()
    }

    /// Number of failing assets
    #[must_use]
    pub fn asset_count(&self) -> usize {
        self.assets
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    /// All dandiset metadata errors, in report order
    #[must_use]
    pub fn dandiset_errs(&self) -> Vec<PydanticValidationErr> {
        self.dandisets
            .values()
            .flat_map(BTreeMap::values)
            .flat_map(|report| &report.jsonschema_validation_errs)
            .map(JsonschemaValidationErr::to_err)
            .collect()
    }

    /// All asset metadata errors, in report order
    #[must_use]
    pub fn asset_errs(&self) -> Vec<PydanticValidationErr> {
        self.assets
            .values()
            .flat_map(BTreeMap::values)
            .flatten()
            .flat_map(|report| &report.jsonschema_validation_errs)
            .map(JsonschemaValidationErr::to_err)
            .collect()
    }

    /// Read the two report files from `<reports_dir>/manifests/`
    ///
    /// # Errors
    ///
    /// Returns `StatusError::ParseError` if either file is missing or
    /// malformed.
    pub async fn read(reports_dir: &Path) -> Result<Self> {
        let dir = reports_dir.join(MANIFESTS_SUBDIR);
        let dandiset_path = dir.join(DANDISET_REPORTS_FILE);
        let asset_path = dir.join(ASSET_REPORTS_FILE);
        let (dandisets, assets) = tokio::try_join!(
            read_reports::<DandisetValidationReports>(&dandiset_path),
            read_reports::<AssetValidationReports>(&asset_path)
        )?;
        Ok(Self { dandisets, assets })
    }
}

async fn read_reports<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let location = path.display().to_string();
    let content = fs::read_to_string(path).await.map_err(|err| {
        StatusError::parse_at(format!("Failed to read validation reports: {err}"), &location)
    })?;
    serde_json::from_str(&content).map_err(|err| {
        StatusError::parse_at(format!("invalid validation reports: {err}"), &location)
    })
}
