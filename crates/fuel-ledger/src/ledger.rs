//! The Ledger: unified API for the fuel expense subsystem.
//!
//! The Ledger brings together the record store, the integrity and backup
//! layer, the batch aggregator, and the exporters over one key-value port.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use fuel_ledger_core::{
    export, month_name, stats, validate, BatchId, BatchStatus, BatchSubmission, CoreError,
    FuelRecord, IntegrityReport, MonthlyStats, RecordDraft, RecordId, StorageStats,
};
use fuel_ledger_store::{KvStore, KvStoreExt};

use crate::error::{LedgerError, Result};

/// Slot holding the primary record collection.
pub const RECORDS_KEY: &str = "fuel_records";
/// Slot holding the backup envelope.
pub const BACKUP_KEY: &str = "fuel_records_backup";
/// Slot holding the time of the last backup.
pub const BACKUP_TIMESTAMP_KEY: &str = "fuel_records_backup_timestamp";
/// Slot holding the batch submissions.
pub const BATCHES_KEY: &str = "batch_submissions";

/// Version stamped into backup envelopes.
pub const BACKUP_VERSION: &str = "1.0";

/// Configuration for the Ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Whether a failing integrity report blocks batch submission.
    pub validate_before_submit: bool,
    /// Whether mutations refresh the backup slot as a side effect.
    pub backup_on_mutation: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            validate_before_submit: true,
            backup_on_mutation: true,
        }
    }
}

/// The backup slot payload: the full record set plus provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupEnvelope {
    pub records: Vec<FuelRecord>,
    pub timestamp: String,
    pub version: String,
}

/// Either shape the backup slot has historically held: the envelope, or a
/// bare record array.
#[derive(Deserialize)]
#[serde(untagged)]
enum BackupShape {
    Envelope(BackupEnvelope),
    Bare(Vec<FuelRecord>),
}

/// The main Ledger struct.
///
/// Provides a unified API for:
/// - Saving, querying, and deleting fuel records
/// - Integrity checks and backup/restore of the record set
/// - Materializing and submitting monthly batches
/// - CSV/JSON export
///
/// All operations are synchronous read-modify-write against the key-value
/// port; the concurrency contract is last-write-wins (single operator, one
/// handle at a time).
pub struct Ledger<S: KvStore> {
    /// The storage backend.
    kv: Arc<S>,
    /// Configuration.
    config: LedgerConfig,
    /// Failed best-effort backup writes since construction.
    backup_failures: AtomicU64,
}

impl<S: KvStore> Ledger<S> {
    /// Create a new ledger over the given store.
    pub fn new(store: S, config: LedgerConfig) -> Self {
        Self {
            kv: Arc::new(store),
            config,
            backup_failures: AtomicU64::new(0),
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.kv
    }

    /// Get the active configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// How many best-effort backup refreshes have failed.
    ///
    /// Backup failures never abort the primary operation; this counter and
    /// a `warn!` are their only trace.
    pub fn backup_failure_count(&self) -> u64 {
        self.backup_failures.load(Ordering::Relaxed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Record Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Persist a new record from a draft.
    ///
    /// Assigns a fresh id and creation timestamp and computes the stored
    /// totals. A rejected primary write (quota, I/O) propagates to the
    /// caller; on success the backup slot is refreshed best-effort.
    pub async fn save_record(&self, draft: RecordDraft) -> Result<FuelRecord> {
        let mut records = self.load_records().await?;

        let record = draft.into_record(RecordId::generate(), now_iso());
        records.push(record.clone());

        self.kv.set_json(RECORDS_KEY, &records).await?;
        self.backup_after_mutation(&records).await;

        Ok(record)
    }

    /// All records in append order. Empty when nothing was saved yet;
    /// a corrupt slot degrades to empty with a warning, never an error.
    pub async fn all_records(&self) -> Result<Vec<FuelRecord>> {
        self.load_records().await
    }

    /// Records whose `date` equals `date` exactly.
    pub async fn records_by_date(&self, date: &str) -> Result<Vec<FuelRecord>> {
        let records = self.load_records().await?;
        Ok(records.into_iter().filter(|r| r.date == date).collect())
    }

    /// Records falling in the given calendar month (`month0` zero-based).
    ///
    /// Records with unparseable dates are excluded and logged.
    pub async fn records_by_month(&self, year: i32, month0: u32) -> Result<Vec<FuelRecord>> {
        let records = self.load_records().await?;
        Ok(filter_month(records, year, month0))
    }

    /// As [`records_by_month`](Self::records_by_month), restricted to
    /// records not yet stamped into a batch.
    pub async fn unsubmitted_by_month(&self, year: i32, month0: u32) -> Result<Vec<FuelRecord>> {
        let records = self.records_by_month(year, month0).await?;
        Ok(records.into_iter().filter(|r| !r.submitted_in_batch).collect())
    }

    /// Delete the record with the given id. No-op when absent.
    pub async fn delete_record(&self, id: &RecordId) -> Result<()> {
        let mut records = self.load_records().await?;
        let before = records.len();
        records.retain(|r| &r.id != id);

        if records.len() != before {
            self.kv.set_json(RECORDS_KEY, &records).await?;
        }
        Ok(())
    }

    /// Stamp the given records as submitted in a batch.
    ///
    /// `submittedInBatch` and `batchSubmissionDate` are set once; records
    /// already stamped keep their original submission date. Refreshes the
    /// backup as a side effect.
    pub async fn mark_submitted(&self, ids: &[RecordId]) -> Result<()> {
        let mut records = self.load_records().await?;
        let stamped_at = now_iso();

        for record in &mut records {
            if ids.contains(&record.id) && !record.submitted_in_batch {
                record.submitted_in_batch = true;
                record.batch_submission_date = Some(stamped_at.clone());
            }
        }

        self.kv.set_json(RECORDS_KEY, &records).await?;
        self.backup_after_mutation(&records).await;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Integrity & Backup
    // ─────────────────────────────────────────────────────────────────────────

    /// Scan the stored records for missing required fields.
    ///
    /// Pure read with no side effects. An unreadable primary slot reports
    /// `valid = false` rather than failing.
    pub async fn validate_integrity(&self) -> Result<IntegrityReport> {
        match self.kv.get_json::<Vec<FuelRecord>>(RECORDS_KEY).await {
            Ok(Some(records)) => Ok(validate::validate_records(&records)),
            Ok(None) => Ok(IntegrityReport::clean()),
            Err(err) if err.is_corrupt() => Ok(IntegrityReport::from_errors(vec![format!(
                "Stored records are unreadable: {}",
                err
            )])),
            Err(err) => Err(err.into()),
        }
    }

    /// Write a fresh backup of the record set, replacing any prior backup.
    ///
    /// This is the explicit form: failures propagate. The automatic
    /// refresh after mutations is best-effort instead.
    pub async fn backup(&self) -> Result<()> {
        let records = self.load_records().await?;
        self.write_backup(&records).await
    }

    /// Read the backed-up record set.
    ///
    /// `None` when no backup was ever taken or the slot is unreadable.
    /// Read-only: restoring into the primary slot is a separate, explicit
    /// step ([`apply_restored_snapshot`](Self::apply_restored_snapshot)).
    pub async fn restore_from_backup(&self) -> Result<Option<Vec<FuelRecord>>> {
        match self.kv.get_json::<BackupShape>(BACKUP_KEY).await {
            Ok(Some(BackupShape::Envelope(envelope))) => Ok(Some(envelope.records)),
            Ok(Some(BackupShape::Bare(records))) => Ok(Some(records)),
            Ok(None) => Ok(None),
            Err(err) if err.is_corrupt() => {
                tracing::warn!(error = %err, "backup slot unreadable");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Overwrite the primary record slot with a restored snapshot.
    pub async fn apply_restored_snapshot(&self, records: Vec<FuelRecord>) -> Result<()> {
        self.kv.set_json(RECORDS_KEY, &records).await?;
        Ok(())
    }

    async fn write_backup(&self, records: &[FuelRecord]) -> Result<()> {
        let envelope = BackupEnvelope {
            records: records.to_vec(),
            timestamp: now_iso(),
            version: BACKUP_VERSION.to_string(),
        };
        self.kv.set_json(BACKUP_KEY, &envelope).await?;
        self.kv.set(BACKUP_TIMESTAMP_KEY, &envelope.timestamp).await?;
        Ok(())
    }

    /// Best-effort backup refresh after a successful primary write.
    ///
    /// A crash between the primary write and this refresh leaves the
    /// backup stale by one mutation; that is the accepted contract.
    async fn backup_after_mutation(&self, records: &[FuelRecord]) {
        if !self.config.backup_on_mutation {
            return;
        }
        if let Err(err) = self.write_backup(records).await {
            self.backup_failures.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(error = %err, "backup refresh failed");
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Batch Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch the batch for `(year, month0)`, materializing it on first
    /// request.
    ///
    /// A pending batch is re-materialized from the live records on every
    /// fetch (same id and creation time, refreshed snapshot and totals);
    /// a submitted batch is frozen and returned verbatim.
    pub async fn get_or_create_batch(&self, year: i32, month0: u32) -> Result<BatchSubmission> {
        if month_name(month0).is_none() {
            return Err(CoreError::InvalidMonth(month0).into());
        }

        let mut batches = self.load_batches().await?;

        if let Some(position) = batches
            .iter()
            .position(|b| b.year == year && b.month_number == month0)
        {
            if batches[position].status.is_submitted() {
                return Ok(batches[position].clone());
            }

            let live = self.records_by_month(year, month0).await?;
            batches[position].set_snapshot(live);
            let refreshed = batches[position].clone();
            self.kv.set_json(BATCHES_KEY, &batches).await?;
            return Ok(refreshed);
        }

        let live = self.records_by_month(year, month0).await?;
        let batch = BatchSubmission::new(BatchId::generate(), year, month0, live, now_iso())?;
        batches.push(batch.clone());
        self.kv.set_json(BATCHES_KEY, &batches).await?;
        Ok(batch)
    }

    /// All batches in storage order.
    pub async fn all_batches(&self) -> Result<Vec<BatchSubmission>> {
        self.load_batches().await
    }

    /// All batches ordered by creation time, newest first.
    pub async fn list_batches(&self) -> Result<Vec<BatchSubmission>> {
        let mut batches = self.load_batches().await?;
        batches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(batches)
    }

    /// Submit a pending batch, freezing its snapshot for good.
    ///
    /// Fails with [`LedgerError::AlreadySubmitted`] on a second attempt and,
    /// when configured, with [`LedgerError::IntegrityGate`] if the record
    /// set has integrity issues. Refreshes the backup on success.
    pub async fn submit_batch(&self, id: &BatchId) -> Result<BatchSubmission> {
        if self.config.validate_before_submit {
            let report = self.validate_integrity().await?;
            if !report.valid {
                return Err(LedgerError::IntegrityGate(report));
            }
        }

        let mut batches = self.load_batches().await?;
        let position = batches
            .iter()
            .position(|b| &b.id == id)
            .ok_or_else(|| LedgerError::BatchNotFound(id.clone()))?;

        if batches[position].status.is_submitted() {
            return Err(LedgerError::AlreadySubmitted(id.clone()));
        }

        // Final snapshot refresh before the freeze
        let live = self
            .records_by_month(batches[position].year, batches[position].month_number)
            .await?;
        let batch = &mut batches[position];
        batch.set_snapshot(live);
        batch.status = BatchStatus::Submitted;
        batch.submitted_at = Some(now_iso());

        let submitted = batch.clone();
        self.kv.set_json(BATCHES_KEY, &batches).await?;

        let records = self.load_records().await?;
        self.backup_after_mutation(&records).await;

        Ok(submitted)
    }

    /// Delete a batch. No-op when absent.
    ///
    /// Records stamped by an earlier submission keep their flags; deleting
    /// the batch does not reconcile them.
    pub async fn delete_batch(&self, id: &BatchId) -> Result<()> {
        let mut batches = self.load_batches().await?;
        let before = batches.len();
        batches.retain(|b| &b.id != id);

        if batches.len() != before {
            self.kv.set_json(BATCHES_KEY, &batches).await?;
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statistics & Export
    // ─────────────────────────────────────────────────────────────────────────

    /// Aggregate statistics for one calendar month.
    pub async fn monthly_stats(&self, year: i32, month0: u32) -> Result<MonthlyStats> {
        let records = self.records_by_month(year, month0).await?;
        Ok(stats::monthly_stats(&records))
    }

    /// Bookkeeping counters for the stored collection.
    pub async fn storage_stats(&self) -> Result<StorageStats> {
        let records = self.load_records().await?;
        Ok(stats::storage_stats(&records)?)
    }

    /// Render all records as CSV.
    pub async fn export_csv(&self) -> Result<String> {
        let records = self.load_records().await?;
        Ok(export::records_to_csv(&records))
    }

    /// Render all records as pretty-printed JSON.
    pub async fn export_json(&self) -> Result<String> {
        let records = self.load_records().await?;
        Ok(export::records_to_json(&records)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Slot Access
    // ─────────────────────────────────────────────────────────────────────────

    async fn load_records(&self) -> Result<Vec<FuelRecord>> {
        self.load_slot(RECORDS_KEY).await
    }

    async fn load_batches(&self) -> Result<Vec<BatchSubmission>> {
        self.load_slot(BATCHES_KEY).await
    }

    /// Read a collection slot, failing open: a missing or unreadable slot
    /// is an empty collection, any other store fault propagates.
    async fn load_slot<T>(&self, key: &str) -> Result<Vec<T>>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        match self.kv.get_json::<Vec<T>>(key).await {
            Ok(Some(items)) => Ok(items),
            Ok(None) => Ok(Vec::new()),
            Err(err) if err.is_corrupt() => {
                tracing::warn!(key = key, error = %err, "slot unreadable, treating as empty");
                Ok(Vec::new())
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Keep only the records falling in `(year, month0)`, dropping and logging
/// records whose date does not parse.
fn filter_month(records: Vec<FuelRecord>, year: i32, month0: u32) -> Vec<FuelRecord> {
    records
        .into_iter()
        .filter(|record| {
            if record.parsed_date().is_none() {
                tracing::warn!(
                    id = %record.id,
                    date = %record.date,
                    "record date unparseable, excluded from month filter"
                );
                return false;
            }
            record.matches_month(year, month0)
        })
        .collect()
}

/// Current time as an RFC 3339 UTC timestamp with millisecond precision.
fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
