//! Error types for bm25l-core.

use std::path::PathBuf;

use thiserror::Error;

/// Domain-specific errors for scoring and indexing operations.
#[derive(Error, Debug)]
pub enum Bm25lError {
    /// An I/O failure from a norm source or document store.
    ///
    /// Norm retrieval errors are passed through untouched so the host engine
    /// sees the same error the storage layer produced.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A configuration value is invalid.
    #[error("Invalid configuration: {message}. {hint}")]
    InvalidConfiguration {
        /// Description of the invalid configuration.
        message: String,
        /// Actionable hint on how to fix it.
        hint: String,
    },

    /// Configuration file could not be read or parsed.
    #[error("Config invalid: {0}")]
    InvalidConfig(String),

    /// A weight was requested without any term statistics.
    #[error("Cannot compute a weight without at least one term")]
    NoTerms,

    /// Length normalization would divide by a non-positive or non-finite average.
    #[error("Average length {avgdl} of field `{field}` cannot normalize documents with b={b}")]
    InvalidAverageLength {
        /// Field whose statistics produced the average.
        field: String,
        /// The offending average document length.
        avgdl: f32,
        /// Length normalization strength in effect.
        b: f32,
    },

    /// Fetching a document's content failed during indexing.
    #[error("Failed to fetch document {doc_id}: {source}")]
    DocumentFetch {
        /// Sequential id of the document within its collection.
        doc_id: u32,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A path handed to a collection does not exist or is not a directory.
    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Bm25lError>;
