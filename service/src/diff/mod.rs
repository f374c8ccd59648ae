//! Comparison of schema models

pub mod engine;
pub mod version;

pub use engine::{DiffOptions, SchemaDiff};
pub use version::{check_versions, parse_version, versions_compatible};
