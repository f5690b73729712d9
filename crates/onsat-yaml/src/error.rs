//! Error types for manifest loading.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for manifest parsing and validation.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
    /// JSON parsing error (browser config strings)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Manifest file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// Invalid value
    #[error("invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Error message
        message: String,
    },
    /// Invalid value inside one counter entry
    #[error("counter {index}: invalid value for '{field}': {message}")]
    InvalidCounter {
        /// Zero-based position in the `counters` list
        index: usize,
        /// Field name
        field: &'static str,
        /// Error message
        message: String,
    },
    /// Section without counters
    #[error("stats section '{0}' has no counters")]
    NoCounters(String),
}

impl ManifestError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }

    /// Attach a counter index to a field error.
    #[must_use]
    pub(crate) fn at_counter(self, index: usize) -> Self {
        match self {
            Self::InvalidValue { field, message } => Self::InvalidCounter {
                index,
                field,
                message,
            },
            other => other,
        }
    }
}
