//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Write rejected: it would push the slot past the configured capacity.
    #[error("quota exceeded: write of {attempted} bytes over {limit}-byte capacity")]
    QuotaExceeded { attempted: usize, limit: usize },

    /// Stored value is not valid JSON for the expected shape.
    #[error("corrupt data at {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Value could not be JSON-encoded for storage.
    #[error("serialization error: {0}")]
    Serialization(serde_json::Error),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Whether this error means the stored bytes were unreadable, as
    /// opposed to the store itself failing.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Corrupt { .. })
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
