//! End-to-end tests for the ledger over the in-memory and SQLite backends.

use async_trait::async_trait;
use fuel_ledger::store::{KvStore, KvStoreExt, MemoryKv, SqliteKv, StoreError};
use fuel_ledger::{
    BackupEnvelope, BatchStatus, FuelRecord, Ledger, LedgerConfig, LedgerError, RecordDraft,
    RecordId, BACKUP_KEY, RECORDS_KEY,
};
use fuel_ledger_testkit::fixtures::{draft_on, full_draft};

fn memory_ledger() -> Ledger<MemoryKv> {
    Ledger::new(MemoryKv::new(), LedgerConfig::default())
}

/// Route degraded-path warnings into the test output.
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Draft on `date` whose grand total is exactly `total`, via the
/// other-expenses line.
fn draft_totalling(date: &str, total: f64) -> RecordDraft {
    draft_on(date).other("Misc", format!("{}", total))
}

// ─────────────────────────────────────────────────────────────────────────
// Record Operations
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_save_assigns_identity_and_persists() {
    let ledger = memory_ledger();

    let record = ledger.save_record(full_draft("2024-07-01")).await.unwrap();
    assert!(!record.id.as_str().is_empty());
    assert!(!record.created_at.is_empty());
    assert!(!record.submitted_in_batch);

    let all = ledger.all_records().await.unwrap();
    assert_eq!(all, vec![record]);
}

#[tokio::test]
async fn test_save_preserves_append_order() {
    let ledger = memory_ledger();
    let first = ledger.save_record(draft_on("2024-07-01")).await.unwrap();
    let second = ledger.save_record(draft_on("2024-07-02")).await.unwrap();

    let all = ledger.all_records().await.unwrap();
    assert_eq!(all[0].id, first.id);
    assert_eq!(all[1].id, second.id);
}

#[tokio::test]
async fn test_save_propagates_quota_failure() {
    let ledger = Ledger::new(MemoryKv::with_capacity(64), LedgerConfig::default());

    let err = ledger.save_record(full_draft("2024-07-01")).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Store(StoreError::QuotaExceeded { .. })
    ));

    // Nothing was persisted
    assert!(ledger.all_records().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_records_by_date_is_exact_match() {
    let ledger = memory_ledger();
    ledger.save_record(draft_on("2024-07-01")).await.unwrap();
    ledger.save_record(draft_on("2024-07-02")).await.unwrap();

    let hits = ledger.records_by_date("2024-07-01").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].date, "2024-07-01");

    assert!(ledger.records_by_date("2024-07").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_month_filter_scenario() {
    let ledger = memory_ledger();
    ledger.save_record(draft_totalling("2024-07-01", 50.0)).await.unwrap();
    ledger.save_record(draft_totalling("2024-07-15", 75.0)).await.unwrap();
    ledger.save_record(draft_totalling("2024-08-01", 20.0)).await.unwrap();

    let july = ledger.records_by_month(2024, 6).await.unwrap();
    assert_eq!(july.len(), 2);

    let august = ledger.records_by_month(2024, 7).await.unwrap();
    assert_eq!(august.len(), 1);

    let july_batch = ledger.get_or_create_batch(2024, 6).await.unwrap();
    assert_eq!(july_batch.total_spending, 125.0);

    let august_batch = ledger.get_or_create_batch(2024, 7).await.unwrap();
    assert_eq!(august_batch.total_spending, 20.0);
}

#[tokio::test]
async fn test_unparseable_dates_excluded_from_month_filter() {
    let ledger = memory_ledger();
    ledger.save_record(draft_on("July 1st 2024")).await.unwrap();
    ledger.save_record(draft_on("2024-07-02")).await.unwrap();

    assert_eq!(ledger.all_records().await.unwrap().len(), 2);
    assert_eq!(ledger.records_by_month(2024, 6).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_record_and_absent_noop() {
    let ledger = memory_ledger();
    let record = ledger.save_record(draft_on("2024-07-01")).await.unwrap();

    ledger.delete_record(&record.id).await.unwrap();
    assert!(ledger.all_records().await.unwrap().is_empty());

    // Deleting again is a no-op, not an error
    ledger.delete_record(&record.id).await.unwrap();
    ledger.delete_record(&RecordId::new("no-such-id")).await.unwrap();
}

#[tokio::test]
async fn test_mark_submitted_stamps_once() {
    let ledger = memory_ledger();
    let record = ledger.save_record(draft_on("2024-07-01")).await.unwrap();

    ledger.mark_submitted(&[record.id.clone()]).await.unwrap();
    let stamped = &ledger.all_records().await.unwrap()[0];
    assert!(stamped.submitted_in_batch);
    let first_date = stamped.batch_submission_date.clone().unwrap();

    // A second stamping keeps the original submission date
    ledger.mark_submitted(&[record.id.clone()]).await.unwrap();
    let restamped = &ledger.all_records().await.unwrap()[0];
    assert_eq!(restamped.batch_submission_date.as_ref(), Some(&first_date));
}

#[tokio::test]
async fn test_unsubmitted_by_month_excludes_marked() {
    let ledger = memory_ledger();
    let a = ledger.save_record(draft_on("2024-07-01")).await.unwrap();
    let b = ledger.save_record(draft_on("2024-07-02")).await.unwrap();

    ledger.mark_submitted(&[a.id.clone()]).await.unwrap();

    let open = ledger.unsubmitted_by_month(2024, 6).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, b.id);
}

// ─────────────────────────────────────────────────────────────────────────
// Integrity & Backup
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_validate_integrity_reports_missing_fields() {
    let ledger = memory_ledger();
    ledger
        .save_record(RecordDraft::new("2024-07-01", "Jane", ""))
        .await
        .unwrap();

    let report = ledger.validate_integrity().await.unwrap();
    assert!(!report.valid);
    assert_eq!(report.errors, vec!["Record 1: Missing truck registration"]);
}

#[tokio::test]
async fn test_corrupt_slot_fails_open_but_flags_integrity() {
    init_tracing();
    let ledger = memory_ledger();
    ledger.store().set(RECORDS_KEY, "{not json").await.unwrap();

    // Reads degrade to empty
    assert!(ledger.all_records().await.unwrap().is_empty());

    // The integrity check still reports the damage
    let report = ledger.validate_integrity().await.unwrap();
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 1);
}

#[tokio::test]
async fn test_backup_freshness_after_each_save() {
    let ledger = memory_ledger();

    for (i, date) in ["2024-07-01", "2024-07-02", "2024-07-03"].iter().enumerate() {
        ledger.save_record(draft_on(date)).await.unwrap();

        let envelope: BackupEnvelope = ledger
            .store()
            .get_json(BACKUP_KEY)
            .await
            .unwrap()
            .expect("backup refreshed on save");
        assert_eq!(envelope.records.len(), i + 1);
        assert_eq!(envelope.version, "1.0");
    }
}

#[tokio::test]
async fn test_restore_from_backup_round_trip() {
    let ledger = memory_ledger();
    ledger.save_record(full_draft("2024-07-01")).await.unwrap();

    let restored = ledger.restore_from_backup().await.unwrap().unwrap();
    assert_eq!(restored, ledger.all_records().await.unwrap());
}

#[tokio::test]
async fn test_restore_accepts_bare_array_backup() {
    let ledger = memory_ledger();
    let record = ledger.save_record(draft_on("2024-07-01")).await.unwrap();

    // Older data wrote the records array without the envelope
    let bare = serde_json::to_string(&vec![record.clone()]).unwrap();
    ledger.store().set(BACKUP_KEY, &bare).await.unwrap();

    let restored = ledger.restore_from_backup().await.unwrap().unwrap();
    assert_eq!(restored, vec![record]);
}

#[tokio::test]
async fn test_restore_handles_missing_and_corrupt_backup() {
    let ledger = memory_ledger();
    assert!(ledger.restore_from_backup().await.unwrap().is_none());

    ledger.store().set(BACKUP_KEY, "][").await.unwrap();
    assert!(ledger.restore_from_backup().await.unwrap().is_none());
}

#[tokio::test]
async fn test_apply_restored_snapshot_overwrites_primary() {
    let ledger = memory_ledger();
    ledger.save_record(draft_on("2024-07-01")).await.unwrap();
    ledger.save_record(draft_on("2024-07-02")).await.unwrap();

    let snapshot = ledger.restore_from_backup().await.unwrap().unwrap();
    ledger.save_record(draft_on("2024-07-03")).await.unwrap();

    ledger.apply_restored_snapshot(snapshot.clone()).await.unwrap();
    assert_eq!(ledger.all_records().await.unwrap(), snapshot);
}

/// Store that accepts primary writes but rejects backup slots, to observe
/// the asymmetric failure contract.
struct FailingBackupKv {
    inner: MemoryKv,
}

#[async_trait]
impl KvStore for FailingBackupKv {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if key.starts_with(BACKUP_KEY) {
            return Err(StoreError::Io(std::io::Error::other("backup slot unavailable")));
        }
        self.inner.set(key, value).await
    }
}

#[tokio::test]
async fn test_backup_failure_never_aborts_the_primary_write() {
    init_tracing();
    let ledger = Ledger::new(
        FailingBackupKv { inner: MemoryKv::new() },
        LedgerConfig::default(),
    );

    let record = ledger.save_record(draft_on("2024-07-01")).await.unwrap();
    assert_eq!(ledger.all_records().await.unwrap(), vec![record]);
    assert_eq!(ledger.backup_failure_count(), 1);

    // The explicit backup operation does propagate
    assert!(ledger.backup().await.is_err());
}

// ─────────────────────────────────────────────────────────────────────────
// Batch Operations
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_or_create_batch_is_idempotent() {
    let ledger = memory_ledger();
    ledger.save_record(draft_totalling("2024-07-01", 50.0)).await.unwrap();

    let first = ledger.get_or_create_batch(2024, 6).await.unwrap();
    let second = ledger.get_or_create_batch(2024, 6).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.created_at, second.created_at);
    assert_eq!(second.total_records, 1);
    assert_eq!(second.month, "July");
    assert!(second.status.is_pending());
}

#[tokio::test]
async fn test_pending_batch_tracks_live_records() {
    let ledger = memory_ledger();
    ledger.save_record(draft_totalling("2024-07-01", 50.0)).await.unwrap();

    let batch = ledger.get_or_create_batch(2024, 6).await.unwrap();
    assert_eq!(batch.total_records, 1);

    ledger.save_record(draft_totalling("2024-07-15", 75.0)).await.unwrap();

    let refreshed = ledger.get_or_create_batch(2024, 6).await.unwrap();
    assert_eq!(refreshed.id, batch.id);
    assert_eq!(refreshed.total_records, 2);
    assert_eq!(refreshed.total_spending, 125.0);
}

#[tokio::test]
async fn test_invalid_month_rejected() {
    let ledger = memory_ledger();
    let err = ledger.get_or_create_batch(2024, 12).await.unwrap_err();
    assert!(matches!(err, LedgerError::Core(_)));
}

#[tokio::test]
async fn test_submit_batch_freezes_snapshot() {
    let ledger = memory_ledger();
    ledger.save_record(draft_totalling("2024-07-01", 50.0)).await.unwrap();

    let batch = ledger.get_or_create_batch(2024, 6).await.unwrap();
    let submitted = ledger.submit_batch(&batch.id).await.unwrap();
    assert_eq!(submitted.status, BatchStatus::Submitted);
    let submitted_at = submitted.submitted_at.clone().expect("submission time set");

    // Records saved after submission never enter the frozen snapshot
    ledger.save_record(draft_totalling("2024-07-20", 99.0)).await.unwrap();
    let frozen = ledger.get_or_create_batch(2024, 6).await.unwrap();
    assert_eq!(frozen.total_records, 1);
    assert_eq!(frozen.total_spending, 50.0);
    assert_eq!(frozen.submitted_at.as_ref(), Some(&submitted_at));
}

#[tokio::test]
async fn test_submit_batch_twice_is_rejected() {
    let ledger = memory_ledger();
    let batch = ledger.get_or_create_batch(2024, 6).await.unwrap();

    ledger.submit_batch(&batch.id).await.unwrap();
    let err = ledger.submit_batch(&batch.id).await.unwrap_err();
    assert!(matches!(err, LedgerError::AlreadySubmitted(_)));

    // Still submitted, submittedAt untouched
    let after = ledger.get_or_create_batch(2024, 6).await.unwrap();
    assert!(after.status.is_submitted());
}

#[tokio::test]
async fn test_submit_unknown_batch_not_found() {
    let ledger = memory_ledger();
    let err = ledger
        .submit_batch(&fuel_ledger::BatchId::new("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::BatchNotFound(_)));
}

#[tokio::test]
async fn test_integrity_gate_blocks_submission() {
    let ledger = memory_ledger();
    ledger
        .save_record(RecordDraft::new("2024-07-01", "", "AB12 CDE"))
        .await
        .unwrap();

    let batch = ledger.get_or_create_batch(2024, 6).await.unwrap();
    let err = ledger.submit_batch(&batch.id).await.unwrap_err();
    assert!(matches!(err, LedgerError::IntegrityGate(_)));

    // With the gate disabled the same submission goes through
    let relaxed = Ledger::new(
        MemoryKv::new(),
        LedgerConfig {
            validate_before_submit: false,
            ..LedgerConfig::default()
        },
    );
    relaxed
        .save_record(RecordDraft::new("2024-07-01", "", "AB12 CDE"))
        .await
        .unwrap();
    let batch = relaxed.get_or_create_batch(2024, 6).await.unwrap();
    relaxed.submit_batch(&batch.id).await.unwrap();
}

#[tokio::test]
async fn test_delete_batch_leaves_record_flags() {
    let ledger = memory_ledger();
    let record = ledger.save_record(draft_on("2024-07-01")).await.unwrap();

    let batch = ledger.get_or_create_batch(2024, 6).await.unwrap();
    ledger.submit_batch(&batch.id).await.unwrap();
    ledger.mark_submitted(&batch.record_ids()).await.unwrap();
    assert_eq!(batch.record_ids(), vec![record.id.clone()]);

    ledger.delete_batch(&batch.id).await.unwrap();
    assert!(ledger.all_batches().await.unwrap().is_empty());

    // The record keeps its stamp; deletion does not reconcile
    let kept = &ledger.all_records().await.unwrap()[0];
    assert!(kept.submitted_in_batch);

    // Absent id is a no-op
    ledger.delete_batch(&batch.id).await.unwrap();
}

#[tokio::test]
async fn test_list_batches_newest_first() {
    let ledger = memory_ledger();
    ledger.get_or_create_batch(2024, 5).await.unwrap();
    ledger.get_or_create_batch(2024, 6).await.unwrap();
    ledger.get_or_create_batch(2024, 7).await.unwrap();

    let listed = ledger.list_batches().await.unwrap();
    assert_eq!(listed.len(), 3);
    assert!(listed[0].created_at >= listed[1].created_at);
    assert!(listed[1].created_at >= listed[2].created_at);
}

// ─────────────────────────────────────────────────────────────────────────
// Statistics & Export
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_monthly_and_storage_stats() {
    let ledger = memory_ledger();
    let record = ledger.save_record(full_draft("2024-07-01")).await.unwrap();
    ledger.save_record(full_draft("2024-07-02")).await.unwrap();
    ledger.mark_submitted(&[record.id.clone()]).await.unwrap();

    let month = ledger.monthly_stats(2024, 6).await.unwrap();
    assert_eq!(month.total_records, 2);
    assert_eq!(month.total_diesel_litres, 301.0);
    assert_eq!(month.by_driver["Jane Smith"].count, 2);

    let storage = ledger.storage_stats().await.unwrap();
    assert_eq!(storage.total_records, 2);
    assert_eq!(storage.submitted_records, 1);
    assert_eq!(storage.pending_records, 1);
    assert!(storage.storage_used_bytes > 0);
}

#[tokio::test]
async fn test_export_csv_shape() {
    let ledger = memory_ledger();
    assert_eq!(ledger.export_csv().await.unwrap(), "");

    ledger.save_record(full_draft("2024-07-01")).await.unwrap();
    let csv = ledger.export_csv().await.unwrap();

    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("Date,Driver Name,Truck Registration"));
    assert_eq!(lines.count(), 1);
}

#[tokio::test]
async fn test_export_json_round_trips() {
    let ledger = memory_ledger();
    ledger.save_record(full_draft("2024-07-01")).await.unwrap();
    ledger.save_record(draft_on("2024-07-02")).await.unwrap();

    let json = ledger.export_json().await.unwrap();
    let reparsed: Vec<FuelRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(reparsed, ledger.all_records().await.unwrap());
}

// ─────────────────────────────────────────────────────────────────────────
// SQLite Backend
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_sqlite_end_to_end() {
    let ledger = Ledger::new(SqliteKv::open_memory().unwrap(), LedgerConfig::default());

    ledger.save_record(draft_totalling("2024-07-01", 50.0)).await.unwrap();
    let batch = ledger.get_or_create_batch(2024, 6).await.unwrap();
    let submitted = ledger.submit_batch(&batch.id).await.unwrap();

    assert!(submitted.status.is_submitted());
    assert_eq!(ledger.all_records().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_sqlite_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");

    {
        let ledger = Ledger::new(SqliteKv::open(&path).unwrap(), LedgerConfig::default());
        ledger.save_record(full_draft("2024-07-01")).await.unwrap();
    }

    let reopened = Ledger::new(SqliteKv::open(&path).unwrap(), LedgerConfig::default());
    let records = reopened.all_records().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].driver_name, "Jane Smith");
}
