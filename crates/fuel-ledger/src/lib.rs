//! # Fuel Ledger
//!
//! The unified API for the fuel expense subsystem - local persistence and
//! batch submission for fleet fuel records.
//!
//! ## Overview
//!
//! The ledger layers four responsibilities over one key-value port:
//!
//! - **Record store**: save, query, filter, and delete fuel records
//! - **Integrity & backup**: advisory required-field checks and a
//!   last-write-wins backup snapshot refreshed after mutations
//! - **Batch aggregator**: one batch per calendar month, promoted through
//!   a one-way pending → submitted lifecycle
//! - **Exporters**: pure CSV/JSON renderings of the record collection
//!
//! ## Key Concepts
//!
//! - **Record**: created once, never edited except for the batch stamp,
//!   deleted only by id. Totals are computed at save time and stored.
//! - **Batch**: at most one per `(year, month)`. Pending batches track the
//!   live records for their month; submission freezes the snapshot.
//! - **Backup**: best-effort side channel. A failed backup is logged and
//!   counted, never fatal; a failed primary write always surfaces.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fuel_ledger::{Ledger, LedgerConfig, RecordDraft};
//! use fuel_ledger::store::SqliteKv;
//!
//! async fn example() {
//!     // Open storage
//!     let store = SqliteKv::open("ledger.db").unwrap();
//!
//!     // Create the ledger
//!     let ledger = Ledger::new(store, LedgerConfig::default());
//!
//!     // Log a fuel stop
//!     ledger
//!         .save_record(
//!             RecordDraft::new("2024-07-01", "Jane Smith", "AB12 CDE")
//!                 .diesel("150.5", "1.45"),
//!         )
//!         .await
//!         .unwrap();
//!
//!     // Materialize July's batch and submit it
//!     let batch = ledger.get_or_create_batch(2024, 6).await.unwrap();
//!     ledger.submit_batch(&batch.id).await.unwrap();
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `fuel_ledger::core` - Domain types (FuelRecord, BatchSubmission, ...)
//! - `fuel_ledger::store` - The key-value port and its backends

pub mod error;
pub mod ledger;

// Re-export component crates
pub use fuel_ledger_core as core;
pub use fuel_ledger_store as store;

// Re-export main types for convenience
pub use error::{LedgerError, Result};
pub use ledger::{
    BackupEnvelope, Ledger, LedgerConfig, BACKUP_KEY, BACKUP_TIMESTAMP_KEY, BACKUP_VERSION,
    BATCHES_KEY, RECORDS_KEY,
};

// Re-export commonly used core types
pub use fuel_ledger_core::{
    BatchId, BatchStatus, BatchSubmission, FuelRecord, IntegrityReport, MonthlyStats, RecordDraft,
    RecordId, StorageStats,
};
