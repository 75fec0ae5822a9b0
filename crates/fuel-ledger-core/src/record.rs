//! Fuel expense records: the atomic unit of the ledger.
//!
//! A record is created exactly once from a [`RecordDraft`], never edited
//! afterwards except for the batch-submission stamp, and deleted only by id.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Format record `date` strings are stored in.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Opaque unique identifier for a fuel record.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
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

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One logged fuel/expense event.
///
/// Raw user-entered amounts stay strings exactly as typed; the derived
/// totals are computed once at save time and stored, never recomputed on
/// read. Serialized field names match the persisted wire format
/// (`driverName`, `submittedInBatch`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelRecord {
    pub id: RecordId,
    /// Calendar date of the expense, `YYYY-MM-DD`.
    pub date: String,
    pub driver_name: String,
    pub truck_registration: String,
    #[serde(default)]
    pub mileage: String,
    #[serde(default)]
    pub diesel_added: String,
    #[serde(default)]
    pub diesel_price: String,
    #[serde(default)]
    pub adblue_added: String,
    #[serde(default)]
    pub adblue_price: String,
    #[serde(default)]
    pub other_expenses: String,
    #[serde(default)]
    pub other_expenses_cost: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub signature_timestamp: String,
    #[serde(default)]
    pub receipt_image: String,
    pub diesel_total: f64,
    pub adblue_total: f64,
    pub other_total: f64,
    pub grand_total: f64,
    /// Store-assigned creation timestamp, RFC 3339 UTC.
    pub created_at: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub submitted_in_batch: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_submission_date: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !value
}

impl FuelRecord {
    /// Parse the record's `date` field.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }

    /// Whether the record falls in the given calendar month.
    ///
    /// `month0` is zero-based (0 = January). Records with unparseable
    /// dates never match.
    pub fn matches_month(&self, year: i32, month0: u32) -> bool {
        self.parsed_date()
            .map(|date| date.year() == year && date.month0() == month0)
            .unwrap_or(false)
    }
}

/// Stored per-category totals, computed once at save time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub diesel_total: f64,
    pub adblue_total: f64,
    pub other_total: f64,
    pub grand_total: f64,
}

/// Everything the caller supplies when logging a fuel stop.
///
/// The save operation assigns `id` and `createdAt` and stamps the computed
/// [`Totals`] onto the stored record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordDraft {
    pub date: String,
    pub driver_name: String,
    pub truck_registration: String,
    pub mileage: String,
    pub diesel_added: String,
    pub diesel_price: String,
    pub adblue_added: String,
    pub adblue_price: String,
    pub other_expenses: String,
    pub other_expenses_cost: String,
    pub signature: String,
    pub signature_timestamp: String,
    pub receipt_image: String,
}

impl RecordDraft {
    /// Start a draft with the required descriptive fields.
    pub fn new(
        date: impl Into<String>,
        driver_name: impl Into<String>,
        truck_registration: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            driver_name: driver_name.into(),
            truck_registration: truck_registration.into(),
            ..Self::default()
        }
    }

    /// Set the odometer reading.
    pub fn mileage(mut self, mileage: impl Into<String>) -> Self {
        self.mileage = mileage.into();
        self
    }

    /// Set diesel litres added and the price paid.
    pub fn diesel(mut self, added: impl Into<String>, price: impl Into<String>) -> Self {
        self.diesel_added = added.into();
        self.diesel_price = price.into();
        self
    }

    /// Set AdBlue litres added and the price paid.
    pub fn adblue(mut self, added: impl Into<String>, price: impl Into<String>) -> Self {
        self.adblue_added = added.into();
        self.adblue_price = price.into();
        self
    }

    /// Set a free-text other-expense line and its cost.
    pub fn other(mut self, description: impl Into<String>, cost: impl Into<String>) -> Self {
        self.other_expenses = description.into();
        self.other_expenses_cost = cost.into();
        self
    }

    /// Set the signature name snapshot and its capture time.
    pub fn signature(mut self, name: impl Into<String>, timestamp: impl Into<String>) -> Self {
        self.signature = name.into();
        self.signature_timestamp = timestamp.into();
        self
    }

    /// Attach embedded receipt image data.
    pub fn receipt_image(mut self, data: impl Into<String>) -> Self {
        self.receipt_image = data.into();
        self
    }

    /// The standard calculation path for the stored totals.
    ///
    /// Each category total is `added * price` rounded to 2 dp (the other
    /// line is its cost alone); the grand total is the sum of the rounded
    /// category totals, rounded again, so the stored equality
    /// `grand_total == round2(diesel + adblue + other)` is exact.
    pub fn totals(&self) -> Totals {
        let diesel_total = round2(parse_amount(&self.diesel_added) * parse_amount(&self.diesel_price));
        let adblue_total = round2(parse_amount(&self.adblue_added) * parse_amount(&self.adblue_price));
        let other_total = round2(parse_amount(&self.other_expenses_cost));
        let grand_total = round2(diesel_total + adblue_total + other_total);
        Totals {
            diesel_total,
            adblue_total,
            other_total,
            grand_total,
        }
    }

    /// Finish the draft into a full record with store-assigned identity.
    pub fn into_record(self, id: RecordId, created_at: String) -> FuelRecord {
        let totals = self.totals();
        FuelRecord {
            id,
            date: self.date,
            driver_name: self.driver_name,
            truck_registration: self.truck_registration,
            mileage: self.mileage,
            diesel_added: self.diesel_added,
            diesel_price: self.diesel_price,
            adblue_added: self.adblue_added,
            adblue_price: self.adblue_price,
            other_expenses: self.other_expenses,
            other_expenses_cost: self.other_expenses_cost,
            signature: self.signature,
            signature_timestamp: self.signature_timestamp,
            receipt_image: self.receipt_image,
            diesel_total: totals.diesel_total,
            adblue_total: totals.adblue_total,
            other_total: totals.other_total,
            grand_total: totals.grand_total,
            created_at,
            submitted_in_batch: false,
            batch_submission_date: None,
        }
    }
}

/// Lenient numeric parse: empty or malformed input counts as zero.
pub(crate) fn parse_amount(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

/// Round to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
