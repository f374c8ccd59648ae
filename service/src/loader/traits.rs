//! Common traits and types for schema loaders

use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use status_core::prelude::*;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Format of a schema source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SchemaFormat {
    /// JSON Schema exported from Pydantic models
    Pydantic,
    /// `LinkML` schema (YAML or JSON)
    Linkml,
    /// Serialized schema model (YAML or JSON)
    Native,
}

/// Resolves a schema source document into a [`SchemaModel`]
#[async_trait]
pub trait SchemaLoader: Send + Sync {
    /// Origin recorded on the models this loader produces
    fn origin(&self) -> SchemaOrigin;

    /// Parse a schema document
    ///
    /// `location` names the source in error messages and selects JSON over
    /// YAML for loaders that accept both.
    ///
    /// # Errors
    ///
    /// Returns `StatusError::ParseError` if the document cannot be resolved
    /// into a schema model.
    fn parse_str(&self, content: &str, location: &str) -> Result<SchemaModel>;

    /// Read and parse a schema file
    ///
    /// # Errors
    ///
    /// Returns `StatusError::ParseError` if the file cannot be read or
    /// parsed.
    async fn load_file(&self, path: &Path) -> Result<SchemaModel> {
        let location = path.display().to_string();
        let content = fs::read_to_string(path).await.map_err(|err| {
            StatusError::parse_at(format!("Failed to read schema file: {err}"), &location)
        })?;
        debug!("Read {} bytes from {}", content.len(), location);

        let model = self.parse_str(&content, &location)?;
        info!(
            "Loaded {} schema '{}' from {}: {} classes, {} enums",
            self.origin(),
            model.name,
            location,
            model.classes.len(),
            model.enums.len()
        );
        Ok(model)
    }
}

/// Whether a location names a JSON document
pub(crate) fn is_json_location(location: &str) -> bool {
    Path::new(location)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Parse a JSON or YAML document into a JSON value
pub(crate) fn parse_document(content: &str, location: &str) -> Result<serde_json::Value> {
    if is_json_location(location) {
        serde_json::from_str(content).map_err(|err| StatusError::parse_at(err.to_string(), location))
    } else {
        serde_yaml::from_str(content).map_err(|err| StatusError::parse_at(err.to_string(), location))
    }
}
