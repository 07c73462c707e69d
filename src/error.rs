//! Error types for the text front-end.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for front-end operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Static data file not found
    #[error("data file not found: {path}")]
    DataFileNotFound { path: PathBuf },

    /// A symbol or syllable is absent from its static table
    #[error("no {table} entry for {key:?}")]
    MissingMapping { table: &'static str, key: String },

    /// Language name outside the recognized set
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Input violating an invariant the dictionaries guarantee
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Failure reported by an external collaborator
    #[error("{collaborator} failed: {message}")]
    Collaborator {
        collaborator: &'static str,
        message: String,
    },
}

/// Result type alias for front-end operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a data-file-not-found error.
    pub fn data_file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DataFileNotFound { path: path.into() }
    }

    /// Create a missing-mapping error for a named table.
    pub fn missing_mapping(table: &'static str, key: impl Into<String>) -> Self {
        Self::MissingMapping {
            table,
            key: key.into(),
        }
    }

    /// Create a collaborator error.
    pub fn collaborator(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self::Collaborator {
            collaborator,
            message: message.into(),
        }
    }
}
