//! Error types for the sentence database builder.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for sentdb operations.
#[derive(Error, Debug)]
pub enum SentenceDbError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Invalid sentence database file.
    #[error("Invalid database format: {0}")]
    InvalidDatabaseFormat(String),

    /// Boundary model could not be loaded or evaluated.
    #[error("Model error: {0}")]
    Model(String),

    /// Label sequence not aligned with the token sequence.
    #[error("Label count mismatch: {tokens} tokens but {labels} labels")]
    LabelMismatch {
        /// Number of token features.
        tokens: usize,
        /// Number of labels.
        labels: usize,
    },

    /// Token span does not lie on character boundaries of the text.
    #[error("Invalid token span {start}..{end} in text of {len} bytes")]
    InvalidSpan {
        /// Span start (byte offset).
        start: usize,
        /// Span end (byte offset).
        end: usize,
        /// Length of the text in bytes.
        len: usize,
    },

    /// Document exceeds the configured size limit.
    #[error("Document too large: {size} bytes (limit {limit})")]
    DocumentTooLarge {
        /// Size of the document in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },

    /// A single document failed to process.
    #[error("Failed to process {path}: {source}")]
    Document {
        /// Path of the document that failed.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: Box<SentenceDbError>,
    },
}

impl SentenceDbError {
    /// Wraps an error with the path of the document it occurred in.
    pub fn in_document(self, path: impl Into<PathBuf>) -> Self {
        SentenceDbError::Document {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for sentdb operations.
pub type Result<T> = std::result::Result<T, SentenceDbError>;

impl From<bincode::Error> for SentenceDbError {
    fn from(err: bincode::Error) -> Self {
        SentenceDbError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for SentenceDbError {
    fn from(err: serde_json::Error) -> Self {
        SentenceDbError::Model(err.to_string())
    }
}
