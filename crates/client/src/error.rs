//! Error types for the request builder
//!
//! Provides structured errors for payload serialization and validation failures.

use thiserror::Error;

/// Result type for builder operations
pub type Result<T> = std::result::Result<T, BuilderError>;

/// Errors that can occur when building a tracking payload
#[derive(Debug, Error)]
pub enum BuilderError {
    /// One or more schema-required fields are absent
    ///
    /// Carries every missing dotted path, not only the first one found.
    #[error("missing required fields: [{}]", missing.join(", "))]
    Validation {
        /// Dotted paths of the missing fields (e.g. `tealium.account`)
        missing: Vec<String>,
    },

    /// The tree could not be rendered as JSON text
    #[error("failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BuilderError {
    /// Create a Validation error
    pub fn validation(missing: Vec<String>) -> Self {
        Self::Validation { missing }
    }

    /// Missing field paths, empty for non-validation errors
    pub fn missing_fields(&self) -> &[String] {
        match self {
            Self::Validation { missing } => missing,
            Self::Serialization(_) => &[],
        }
    }
}
