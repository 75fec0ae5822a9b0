//! Batch submissions: one calendar month of records promoted through a
//! pending → submitted lifecycle.
//!
//! At most one batch exists per `(year, month_number)`; the pair is the
//! uniqueness key the aggregator looks batches up by.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::record::{round2, FuelRecord, RecordId};

/// English month names, indexed by zero-based month number.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Look up the English name for a zero-based month index.
pub fn month_name(month0: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month0 as usize).copied()
}

/// Opaque unique identifier for a batch submission.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(String);

impl BatchId {
    /// Generate a fresh collision-free id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BatchId({})", self.0)
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for BatchId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lifecycle state of a batch.
///
/// The only legal transition is `Pending` → `Submitted`; a submitted batch
/// never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Pending,
    Submitted,
}

impl BatchStatus {
    /// Check if the batch still accepts a submission.
    pub fn is_pending(&self) -> bool {
        matches!(self, BatchStatus::Pending)
    }

    /// Check if the batch has been submitted.
    pub fn is_submitted(&self) -> bool {
        matches!(self, BatchStatus::Submitted)
    }
}

/// A calendar month's records aggregated into a submittable unit.
///
/// `records`, `total_records`, and `total_spending` are a snapshot of the
/// month's records; while the batch is pending the aggregator refreshes the
/// snapshot from live data, and at submission it is frozen for good.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSubmission {
    pub id: BatchId,
    /// English month name, from [`MONTH_NAMES`].
    pub month: String,
    pub year: i32,
    /// Zero-based month index (0 = January).
    pub month_number: u32,
    pub records: Vec<FuelRecord>,
    pub total_records: usize,
    pub total_spending: f64,
    /// `None` (serialized as `null`) until the batch is submitted.
    pub submitted_at: Option<String>,
    pub status: BatchStatus,
    pub created_at: String,
}

impl BatchSubmission {
    /// Materialize a new pending batch from a month's records.
    pub fn new(
        id: BatchId,
        year: i32,
        month0: u32,
        records: Vec<FuelRecord>,
        created_at: String,
    ) -> Result<Self> {
        let month = month_name(month0).ok_or(CoreError::InvalidMonth(month0))?;
        let mut batch = Self {
            id,
            month: month.to_string(),
            year,
            month_number: month0,
            records: Vec::new(),
            total_records: 0,
            total_spending: 0.0,
            submitted_at: None,
            status: BatchStatus::Pending,
            created_at,
        };
        batch.set_snapshot(records);
        Ok(batch)
    }

    /// Replace the record snapshot and recompute the derived totals.
    pub fn set_snapshot(&mut self, records: Vec<FuelRecord>) {
        self.total_records = records.len();
        self.total_spending = round2(records.iter().map(|r| r.grand_total).sum());
        self.records = records;
    }

    /// The ids of the records captured in the snapshot.
    pub fn record_ids(&self) -> Vec<RecordId> {
        self.records.iter().map(|r| r.id.clone()).collect()
    }
}
