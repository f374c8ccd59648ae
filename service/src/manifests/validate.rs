//! Validating dandiset manifests against exported JSON Schemas
//!
//! A manifest tree holds one directory per dandiset and, below it, one
//! directory per version (`draft` or a published version). A version
//! directory may contain `dandiset.jsonld` with the dandiset metadata and
//! `assets.jsonld` with a JSON array of asset metadata. Hidden directories
//! are skipped.

use super::reports::{
    AssetValidationReport, DandisetValidationReport, JsonschemaValidationErr, ManifestReports,
};
use jsonschema::Validator;
use serde_json::Value;
use status_core::prelude::*;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Dandiset metadata file in a version directory
pub const DANDISET_FILE_NAME: &str = "dandiset.jsonld";

/// Asset metadata file in a version directory
pub const ASSETS_FILE_NAME: &str = "assets.jsonld";

/// Version directory name of unpublished metadata
pub const DRAFT_VERSION: &str = "draft";

/// Paths of the JSON Schemas exported from the metadata models
///
/// The published schemas fall back to their draft counterparts when unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSchemaPaths {
    /// Schema of draft dandiset metadata
    pub dandiset: PathBuf,
    /// Schema of draft asset metadata
    pub asset: PathBuf,
    /// Schema of published dandiset metadata
    pub published_dandiset: Option<PathBuf>,
    /// Schema of published asset metadata
    pub published_asset: Option<PathBuf>,
}

/// Compiled validators for dandiset and asset metadata
pub struct ManifestValidators {
    dandiset: Validator,
    published_dandiset: Validator,
    asset: Validator,
    published_asset: Validator,
}

impl ManifestValidators {
    /// Compile validators from JSON Schema documents
    ///
    /// Format assertions are enabled.
    ///
    /// # Errors
    ///
    /// Returns `StatusError::ParseError` if a document is not a valid JSON
    /// Schema.
    pub fn from_schemas(
        dandiset: &Value,
        published_dandiset: &Value,
        asset: &Value,
        published_asset: &Value,
    ) -> Result<Self> {
        Ok(Self {
            dandiset: compile(dandiset, "dandiset schema")?,
            published_dandiset: compile(published_dandiset, "published dandiset schema")?,
            asset: compile(asset, "asset schema")?,
            published_asset: compile(published_asset, "published asset schema")?,
        })
    }

    /// Read and compile the schema files
    ///
    /// # Errors
    ///
    /// Returns `StatusError::ParseError` if a file cannot be read, is not
    /// JSON or is not a valid JSON Schema.
    pub async fn from_files(paths: &ManifestSchemaPaths) -> Result<Self> {
        let published_dandiset = paths
            .published_dandiset
            .as_deref()
            .unwrap_or(&paths.dandiset);
        let published_asset = paths.published_asset.as_deref().unwrap_or(&paths.asset);

        let (dandiset, published_dandiset, asset, published_asset) = tokio::try_join!(
            read_json(&paths.dandiset),
            read_json(published_dandiset),
            read_json(&paths.asset),
            read_json(published_asset)
        )?;
        Self::from_schemas(&dandiset, &published_dandiset, &asset, &published_asset)
    }

    fn for_dandiset(&self, version: &str) -> &Validator {
        if version == DRAFT_VERSION {
            &self.dandiset
        } else {
            &self.published_dandiset
        }
    }

    fn for_asset(&self, version: &str) -> &Validator {
        if version == DRAFT_VERSION {
            &self.asset
        } else {
            &self.published_asset
        }
    }
}

fn compile(schema: &Value, what: &str) -> Result<Validator> {
    jsonschema::options()
        .should_validate_formats(true)
        .build(schema)
        .map_err(|err| StatusError::parse_at(format!("invalid JSON Schema: {err}"), what))
}

async fn read_json(path: &Path) -> Result<Value> {
    let location = path.display().to_string();
    let content = fs::read_to_string(path)
        .await
        .map_err(|err| StatusError::parse_at(format!("Failed to read file: {err}"), &location))?;
    serde_json::from_str(&content).map_err(|err| StatusError::parse_at(err.to_string(), &location))
}

/// All validation errors of an instance, sorted by schema location
#[must_use]
pub fn err_lst(validator: &Validator, instance: &Value) -> Vec<JsonschemaValidationErr> {
    let mut errs: Vec<JsonschemaValidationErr> = validator
        .iter_errors(instance)
        .map(|err| {
            JsonschemaValidationErr::from_pointers(
                err.to_string(),
                &err.instance_path().to_string(),
                &err.schema_path().to_string(),
            )
        })
        .collect();
    errs.sort_by(|a, b| a.absolute_schema_path.cmp(&b.absolute_schema_path));
    errs
}

/// Non-hidden subdirectories of a directory, sorted by name
async fn direct_subdirs(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut subdirs = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || !entry.file_type().await?.is_dir() {
            continue;
        }
        subdirs.push((name, entry.path()));
    }
    subdirs.sort();
    Ok(subdirs)
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|meta| meta.is_file())
}

/// Validate every dandiset and asset metadata file of a manifest tree
///
/// Only metadata that fails validation is reported.
///
/// # Errors
///
/// Returns `StatusError::IoError` if the tree cannot be walked and
/// `StatusError::ParseError` if a metadata file is not JSON or an assets
/// file is not an array of objects.
pub async fn validate_manifests(
    manifest_dir: &Path,
    validators: &ManifestValidators,
) -> Result<ManifestReports> {
    let mut reports = ManifestReports::default();

    for (dandiset_id, dandiset_dir) in direct_subdirs(manifest_dir).await? {
        for (version, version_dir) in direct_subdirs(&dandiset_dir).await? {
            debug!("Validating {}:{}", dandiset_id, version);

            if let Some(report) =
                validate_dandiset(&version_dir, &dandiset_id, &version, validators).await?
            {
                reports
                    .dandisets
                    .entry(dandiset_id.clone())
                    .or_default()
                    .insert(version.clone(), report);
            }

            let assets = validate_assets(&version_dir, &dandiset_id, &version, validators).await?;
            if !assets.is_empty() {
                reports
                    .assets
                    .entry(dandiset_id.clone())
                    .or_default()
                    .insert(version, assets);
            }
        }
    }

    info!(
        "{} dandiset versions and {} assets failed validation",
        reports.dandiset_count(),
        reports.asset_count()
    );
    Ok(reports)
}

async fn validate_dandiset(
    version_dir: &Path,
    dandiset_id: &str,
    version: &str,
    validators: &ManifestValidators,
) -> Result<Option<DandisetValidationReport>> {
    let path = version_dir.join(DANDISET_FILE_NAME);
    if !is_file(&path).await {
        return Ok(None);
    }

    let metadata = read_json(&path).await?;
    let errs = err_lst(validators.for_dandiset(version), &metadata);
    if errs.is_empty() {
        info!("Dandiset {}:{}: dandiset metadata is valid", dandiset_id, version);
        return Ok(None);
    }

    info!(
        "Dandiset {}:{}: dandiset metadata has {} errors",
        dandiset_id,
        version,
        errs.len()
    );
    Ok(Some(DandisetValidationReport {
        dandiset_identifier: dandiset_id.to_string(),
        dandiset_version: version.to_string(),
        jsonschema_validation_errs: errs,
    }))
}

async fn validate_assets(
    version_dir: &Path,
    dandiset_id: &str,
    version: &str,
    validators: &ManifestValidators,
) -> Result<Vec<AssetValidationReport>> {
    let path = version_dir.join(ASSETS_FILE_NAME);
    if !is_file(&path).await {
        return Ok(Vec::new());
    }

    let Value::Array(assets) = read_json(&path).await? else {
        return Err(StatusError::parse_at(
            format!("assets metadata of {dandiset_id}:{version} is not a JSON array"),
            path.display().to_string(),
        ));
    };

    let validator = validators.for_asset(version);
    let mut reports = Vec::new();
    for (idx, asset) in assets.iter().enumerate() {
        let Some(fields) = asset.as_object() else {
            return Err(StatusError::parse_at(
                format!("asset {idx} of {dandiset_id}:{version} is not a JSON object"),
                path.display().to_string(),
            ));
        };

        let errs = err_lst(validator, asset);
        if errs.is_empty() {
            continue;
        }
        let text = |key: &str| fields.get(key).and_then(Value::as_str).map(str::to_string);
        reports.push(AssetValidationReport {
            dandiset_identifier: dandiset_id.to_string(),
            dandiset_version: version.to_string(),
            asset_id: text("id"),
            asset_path: text("path"),
            asset_idx: idx,
            jsonschema_validation_errs: errs,
        });
        debug!(
            "Dandiset {}:{}: added validation report for asset at index {}",
            dandiset_id, version, idx
        );
    }
    Ok(reports)
}
