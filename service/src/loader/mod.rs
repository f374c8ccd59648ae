//! Schema loaders
//!
//! Each loader resolves one kind of schema document into a [`SchemaModel`].
//! [`SchemaFormat::loader`] picks the loader for a format and
//! [`load_schema_file`] reads a file with it.

pub mod linkml;
pub mod native;
pub mod pydantic;
pub mod traits;

pub use linkml::LinkmlSchemaLoader;
pub use native::NativeSchemaLoader;
pub use pydantic::PydanticSchemaLoader;
pub use traits::{SchemaFormat, SchemaLoader};

use status_core::prelude::*;
use std::path::Path;

impl SchemaFormat {
    /// Loader for documents of this format
    #[must_use]
    pub fn loader(self) -> Box<dyn SchemaLoader> {
        match self {
            Self::Pydantic => Box::new(PydanticSchemaLoader::new()),
            Self::Linkml => Box::new(LinkmlSchemaLoader::new()),
            Self::Native => Box::new(NativeSchemaLoader::new()),
        }
    }
}

impl std::fmt::Display for SchemaFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pydantic => write!(f, "pydantic"),
            Self::Linkml => write!(f, "linkml"),
            Self::Native => write!(f, "native"),
        }
    }
}

/// Read a schema file in the given format
///
/// # Errors
///
/// Returns `StatusError::ParseError` if the file cannot be read or resolved.
pub async fn load_schema_file(path: &Path, format: SchemaFormat) -> Result<SchemaModel> {
    format.loader().load_file(path).await
}
