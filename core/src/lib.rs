//! # Schema status core
//!
//! Core types for comparing DANDI schemas expressed as Pydantic models with
//! their `LinkML` translations.
//!
//! The crate holds the data model shared by the loaders and the diff engine:
//! [`SchemaModel`] for a parsed schema, [`DiffRecord`] for one discrepancy,
//! [`StatusReport`] for the outcome of a comparison run, and the error
//! taxonomy every operation reports through.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Error types for schema status operations
pub mod error;

/// Schema model types
pub mod types;

/// Discrepancy records and status reports
pub mod report;

/// Type-compatibility rules
pub mod equivalence;

pub use equivalence::TypeEquivalence;
pub use error::{Result, StatusError};
pub use report::{DiffKind, DiffRecord, ElementPath, ReportSummary, SchemaIdentity, StatusReport};
pub use types::{Cardinality, ClassModel, EnumModel, FieldModel, SchemaModel, SchemaOrigin};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::equivalence::TypeEquivalence;
    pub use crate::error::{Result, StatusError};
    pub use crate::report::*;
    pub use crate::types::*;
}
