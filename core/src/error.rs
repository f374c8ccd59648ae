//! Error types for schema status operations

use thiserror::Error;

/// Main error type for schema status operations
#[derive(Error, Debug)]
pub enum StatusError {
    /// A schema source is malformed or unreachable
    #[error(
        "Failed to parse schema{}: {message}",
        .location.as_deref().map(|l| format!(" ({l})")).unwrap_or_default()
    )]
    ParseError {
        /// Error message
        message: String,
        /// Location of the schema source if available
        location: Option<String>,
    },

    /// Two schemas cannot be compared with each other
    #[error("Schemas are not comparable: {message}")]
    ComparisonError {
        /// Error message
        message: String,
        /// Version declared by the source schema
        source_version: Option<String>,
        /// Version declared by the target schema
        target_version: Option<String>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Generic errors with context
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for schema status operations
pub type Result<T> = std::result::Result<T, StatusError>;

impl StatusError {
    /// Create a new parse error
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location: None,
        }
    }

    /// Create a new parse error with location
    #[must_use]
    pub fn parse_at(message: impl Into<String>, location: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location: Some(location.into()),
        }
    }

    /// Create a comparison error for structurally incomparable inputs
    #[must_use]
    pub fn incomparable(message: impl Into<String>) -> Self {
        Self::ComparisonError {
            message: message.into(),
            source_version: None,
            target_version: None,
        }
    }

    /// Create a comparison error for schemas declaring incompatible versions
    #[must_use]
    pub fn incompatible_versions(
        source_version: impl Into<String>,
        target_version: impl Into<String>,
    ) -> Self {
        let source_version = source_version.into();
        let target_version = target_version.into();
        Self::ComparisonError {
            message: format!(
                "source version {source_version} is incompatible with target version {target_version}"
            ),
            source_version: Some(source_version),
            target_version: Some(target_version),
        }
    }

    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create a serialization error
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError(message.into())
    }

    /// Create a generic error
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            source: None,
        }
    }

    /// Create a generic error with source
    #[must_use]
    pub fn other_with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Other {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error means a schema source could not be resolved
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::ParseError { .. })
    }

    /// Whether this error means the inputs could not be compared
    #[must_use]
    pub fn is_comparison_error(&self) -> bool {
        matches!(self, Self::ComparisonError { .. })
    }
}

impl From<serde_json::Error> for StatusError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for StatusError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<anyhow::Error> for StatusError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other {
            message: err.to_string(),
            source: Some(Box::new(std::io::Error::other(err))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = StatusError::parse("Invalid YAML");
        assert!(err.is_parse_error());

        let err = StatusError::parse_at("Invalid syntax", "schema.yaml");
        match err {
            StatusError::ParseError { location, .. } => {
                assert_eq!(location.as_deref(), Some("schema.yaml"));
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_parse_error_display_names_location() {
        let err = StatusError::parse_at("unexpected token", "schema.yaml");
        assert_eq!(
            err.to_string(),
            "Failed to parse schema (schema.yaml): unexpected token"
        );
        assert_eq!(
            StatusError::parse("empty").to_string(),
            "Failed to parse schema: empty"
        );
    }

    #[test]
    fn test_incompatible_versions_display() {
        let err = StatusError::incompatible_versions("0.6.4", "0.7.0");
        assert!(err.is_comparison_error());
        let display = err.to_string();
        assert!(display.contains("0.6.4"));
        assert!(display.contains("0.7.0"));
    }

    #[test]
    fn test_error_conversions() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let status_err: StatusError = json_err.into();
        assert!(matches!(status_err, StatusError::SerializationError(_)));

        let anyhow_err = anyhow::anyhow!("boom");
        let status_err: StatusError = anyhow_err.into();
        assert_eq!(status_err.to_string(), "boom");
    }
}
