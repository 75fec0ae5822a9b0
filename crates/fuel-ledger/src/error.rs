//! Error types for the Ledger.

use fuel_ledger_core::{BatchId, CoreError, IntegrityReport};
use fuel_ledger_store::StoreError;
use thiserror::Error;

/// Errors that can occur during Ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Storage error: the underlying store rejected a read or write.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Domain error from core computation.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// No batch exists with the given id.
    #[error("batch not found: {0}")]
    BatchNotFound(BatchId),

    /// The batch was already submitted; submission is one-way and not
    /// repeatable.
    #[error("batch already submitted: {0}")]
    AlreadySubmitted(BatchId),

    /// The integrity gate blocked a batch submission.
    #[error("integrity check failed with {} issue(s)", .0.errors.len())]
    IntegrityGate(IntegrityReport),
}

/// Result type for Ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
