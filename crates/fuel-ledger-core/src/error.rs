//! Error types for the core domain.

use thiserror::Error;

/// Errors produced by pure domain computation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Month index outside `0..=11`.
    #[error("invalid month index {0} (expected 0-11)")]
    InvalidMonth(u32),

    /// JSON encoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
