//! Status report renderers
//!
//! Every renderer is a pure function of the report, so identical reports
//! render to identical bytes.

mod markdown;
mod text;

pub use markdown::render_markdown;
pub use text::{render_pretty, render_text, summary_line};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use status_core::prelude::*;
use std::fmt;

/// Output format of a status report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// One line per discrepancy
    #[default]
    Text,
    /// Text with terminal colors
    Pretty,
    /// JSON document
    Json,
    /// YAML document
    Yaml,
    /// Markdown document with tables
    Markdown,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Pretty => "pretty",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Markdown => "markdown",
        };
        f.write_str(name)
    }
}

/// Render a report in the given format
///
/// # Errors
///
/// Returns `StatusError::SerializationError` if JSON or YAML serialization
/// fails.
pub fn render(report: &StatusReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Pretty => Ok(render_pretty(report)),
        ReportFormat::Json => render_json(report),
        ReportFormat::Yaml => render_yaml(report),
        ReportFormat::Markdown => Ok(render_markdown(report)),
    }
}

/// Pretty-printed JSON with a trailing newline
///
/// # Errors
///
/// Returns `StatusError::SerializationError` if serialization fails.
pub fn render_json(report: &StatusReport) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

/// YAML document
///
/// # Errors
///
/// Returns `StatusError::SerializationError` if serialization fails.
pub fn render_yaml(report: &StatusReport) -> Result<String> {
    Ok(serde_yaml::to_string(report)?)
}
