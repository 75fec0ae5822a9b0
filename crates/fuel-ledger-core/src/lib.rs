//! # Fuel Ledger Core
//!
//! Pure domain types and computation for the fuel expense ledger: records,
//! batch submissions, totals, integrity checks, and exporters.
//!
//! This crate contains no I/O. Persistence lives behind the key-value port
//! in `fuel-ledger-store`; the operations tying the two together live in the
//! `fuel-ledger` facade crate.
//!
//! ## Key Types
//!
//! - [`FuelRecord`] - One logged fuel/expense event
//! - [`RecordDraft`] - The caller-supplied input to a save
//! - [`BatchSubmission`] - A calendar month promoted through pending → submitted
//! - [`IntegrityReport`] - Advisory required-field scan results
//!
//! ## Totals
//!
//! Derived totals are computed once, at save time, from the raw
//! user-entered amount strings, and stored on the record. They are never
//! recomputed on read. See [`RecordDraft::totals`].

pub mod batch;
pub mod error;
pub mod export;
pub mod record;
pub mod stats;
pub mod validate;

pub use batch::{month_name, BatchId, BatchStatus, BatchSubmission, MONTH_NAMES};
pub use error::{CoreError, Result};
pub use export::{records_to_csv, records_to_json, CSV_HEADERS};
pub use record::{round2, FuelRecord, RecordDraft, RecordId, Totals};
pub use stats::{monthly_stats, storage_stats, GroupTotal, MonthlyStats, StorageStats};
pub use validate::{validate_records, IntegrityReport};
