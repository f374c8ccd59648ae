//! # dandisets-linkml-status
//!
//! Status reports comparing the DANDI schema's Pydantic models with their
//! `LinkML` translation.
//!
//! The translation itself is produced elsewhere; this crate consumes its
//! two artifacts, the JSON Schema exported from the Pydantic models and the
//! generated `LinkML` schema, resolves both into [`SchemaModel`]s, and
//! reports every discrepancy between them.
//!
//! ## Quick Start
//!
//! ```rust
//! use linkml_status::diff::{DiffOptions, SchemaDiff};
//! use linkml_status::loader::{LinkmlSchemaLoader, PydanticSchemaLoader, SchemaLoader};
//! use status_core::TypeEquivalence;
//!
//! let source = PydanticSchemaLoader::new().parse_str(
//!     r#"{"title": "Subject", "type": "object",
//!         "properties": {"id": {"type": "string"}, "age": {"type": "integer"}},
//!         "required": ["id"]}"#,
//!     "subject.json",
//! )?;
//! let target = LinkmlSchemaLoader::new().parse_str(
//!     "classes:\n  Subject:\n    attributes:\n      id:\n        required: true\n",
//!     "subject.yaml",
//! )?;
//!
//! let options = DiffOptions::default().with_equivalence(TypeEquivalence::pydantic_linkml());
//! let report = SchemaDiff::new(options).diff(&source, &target)?;
//! assert_eq!(report.records()[0].to_string(), "missing-field, Subject.age");
//! # Ok::<(), status_core::StatusError>(())
//! ```
//!
//! ## Modules
//!
//! - [`loader`]: Pydantic JSON Schema, `LinkML` and native model loaders
//! - [`diff`]: the diff engine and version checks
//! - [`render`]: text, colored, JSON, YAML and Markdown reports
//! - [`validation`]: counting and diffing Pydantic validation errors
//! - [`manifests`]: validating dandiset manifests against exported JSON
//!   Schemas and comparing the resulting reports
//! - [`config`]: YAML configuration with environment substitution
//! - [`cli`]: the `dandisets-linkml-status` command

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)] // LinkML, Pydantic and DANDI are proper nouns
#![allow(clippy::format_push_string)]
#![allow(clippy::missing_errors_doc)]

/// Command-line interface
pub mod cli;

/// Configuration loading
pub mod config;

/// Schema comparison
pub mod diff;

/// Schema loaders
pub mod loader;

/// Dandiset manifest validation
pub mod manifests;

/// Markdown helpers
pub mod md;

/// Report files on disk
pub mod output;

/// Report rendering
pub mod render;

/// Validation error counting
pub mod validation;

pub use diff::{DiffOptions, SchemaDiff};
pub use loader::{SchemaFormat, SchemaLoader};
pub use render::ReportFormat;
pub use status_core::prelude::*;

use std::path::Path;

/// Load two schema files and compare them
///
/// Both files are read concurrently.
///
/// # Errors
///
/// Returns `StatusError::ParseError` if either file cannot be loaded and
/// `StatusError::ComparisonError` if the schemas cannot be compared.
pub async fn compare_schema_files(
    source: (&Path, SchemaFormat),
    target: (&Path, SchemaFormat),
    options: DiffOptions,
) -> Result<StatusReport> {
    let source_loader = source.1.loader();
    let target_loader = target.1.loader();
    let (source_model, target_model) = tokio::try_join!(
        source_loader.load_file(source.0),
        target_loader.load_file(target.0)
    )?;
    SchemaDiff::new(options).diff(&source_model, &target_model)
}
