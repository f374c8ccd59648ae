//! Configuration loading for the status tool
//!
//! Configuration is read from a YAML file after `${VAR}` and
//! `${VAR:-default}` references have been replaced from the environment.
//! Every section and key is optional.

use crate::diff::DiffOptions;
use crate::render::ReportFormat;
use regex::Regex;
use serde::{Deserialize, Serialize};
use status_core::prelude::*;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

static ENV_VAR_PATTERN: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\$\{([^}:]+)(?::(-)?([^}]*))?\}"));

/// Load configuration from `YAML` file with environment variable substitution
///
/// # Errors
///
/// Returns `StatusError::IoError` if the file cannot be read
/// Returns `StatusError::ConfigError` if the YAML cannot be parsed
pub fn load_config<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)?;
    let substituted = substitute_env_vars(&contents)?;
    serde_yaml::from_str(&substituted).map_err(|e| {
        StatusError::config(format!(
            "Failed to parse YAML config {}: {e}",
            path.display()
        ))
    })
}

/// Substitute environment variables in the format `${VAR:-default}`
///
/// Unset variables without a default become empty.
///
/// # Errors
///
/// Returns `StatusError::ConfigError` if the substitution pattern cannot be
/// compiled.
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let pattern = ENV_VAR_PATTERN
        .as_ref()
        .map_err(|e| StatusError::config(format!("Invalid substitution pattern: {e}")))?;

    Ok(pattern
        .replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            let default_value = caps.get(3).map_or("", |m| m.as_str());
            env::var(var_name).unwrap_or_else(|_| default_value.to_string())
        })
        .into_owned())
}

/// Complete status tool configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatusConfig {
    /// What the diff engine compares
    pub comparison: ComparisonConfig,
    /// Type names treated as equal
    pub type_equivalence: TypeEquivalenceConfig,
    /// Report output
    pub output: OutputConfig,
}

/// Comparison settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComparisonConfig {
    /// Report shared fields whose cardinality differs
    pub compare_cardinality: bool,
    /// Compare enums and permissible values
    pub compare_enums: bool,
    /// Fail on incompatible schema versions; warn only when false
    pub require_compatible_versions: bool,
    /// Classes left out of the comparison
    pub ignore_classes: Vec<String>,
    /// Fields left out of the comparison, as `Class.field`
    pub ignore_fields: Vec<String>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            compare_cardinality: true,
            compare_enums: true,
            require_compatible_versions: true,
            ignore_classes: Vec::new(),
            ignore_fields: Vec::new(),
        }
    }
}

/// Type equivalence settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypeEquivalenceConfig {
    /// Start from the built-in Pydantic to `LinkML` table
    pub use_builtin: bool,
    /// Additional pairs, each a two-item list
    pub pairs: Vec<(String, String)>,
}

impl Default for TypeEquivalenceConfig {
    fn default() -> Self {
        Self {
            use_builtin: true,
            pairs: Vec::new(),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Format of the report printed to standard output
    pub format: ReportFormat,
    /// Directory receiving report files
    pub dir: Option<PathBuf>,
}

impl TypeEquivalenceConfig {
    /// The equivalence table these settings describe
    #[must_use]
    pub fn table(&self) -> TypeEquivalence {
        let mut table = if self.use_builtin {
            TypeEquivalence::pydantic_linkml()
        } else {
            TypeEquivalence::exact()
        };
        for (a, b) in &self.pairs {
            table.insert(a, b);
        }
        table
    }
}

impl StatusConfig {
    /// Load and validate a configuration file
    ///
    /// # Errors
    ///
    /// Returns `StatusError::IoError` if the file cannot be read and
    /// `StatusError::ConfigError` if it is malformed or invalid.
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: Self = load_config(path)?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check values serde cannot check
    ///
    /// # Errors
    ///
    /// Returns `StatusError::ConfigError` naming the first invalid value.
    pub fn validate(&self) -> Result<()> {
        for class in &self.comparison.ignore_classes {
            if class.trim().is_empty() {
                return Err(StatusError::config("ignore_classes entries must not be empty"));
            }
        }
        for path in &self.comparison.ignore_fields {
            match path.split_once('.') {
                Some((class, field))
                    if !class.is_empty() && !field.is_empty() && !field.contains('.') => {}
                _ => {
                    return Err(StatusError::config(format!(
                        "ignore_fields entry '{path}' is not of the form Class.field"
                    )));
                }
            }
        }
        for (a, b) in &self.type_equivalence.pairs {
            if a.trim().is_empty() || b.trim().is_empty() {
                return Err(StatusError::config(
                    "type_equivalence pairs must name two types",
                ));
            }
        }
        Ok(())
    }

    /// Diff options these settings describe
    #[must_use]
    pub fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            equivalence: self.type_equivalence.table(),
            compare_cardinality: self.comparison.compare_cardinality,
            compare_enums: self.comparison.compare_enums,
            require_compatible_versions: self.comparison.require_compatible_versions,
            ignore_classes: self.comparison.ignore_classes.iter().cloned().collect(),
            ignore_fields: self.comparison.ignore_fields.iter().cloned().collect(),
        }
    }
}
