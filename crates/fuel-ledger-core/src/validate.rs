//! Advisory integrity checks over the stored record collection.
//!
//! Validation never blocks reads or writes; it surfaces data-quality issues
//! to the caller and gates batch submission when configured to.

use crate::record::FuelRecord;

/// Outcome of an integrity scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityReport {
    pub valid: bool,
    /// Human-readable issues, one per missing required field, identifying
    /// the offending record by 1-based position.
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// A report with no issues.
    pub fn clean() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// Build a report from collected issues.
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Scan every record for the minimal required fields.
///
/// Pure read: emits one error string per missing `id`, `driverName`,
/// `truckRegistration`, or `date`.
pub fn validate_records(records: &[FuelRecord]) -> IntegrityReport {
    let mut errors = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let position = index + 1;
        if record.id.as_str().is_empty() {
            errors.push(format!("Record {}: Missing ID", position));
        }
        if record.driver_name.is_empty() {
            errors.push(format!("Record {}: Missing driver name", position));
        }
        if record.truck_registration.is_empty() {
            errors.push(format!("Record {}: Missing truck registration", position));
        }
        if record.date.is_empty() {
            errors.push(format!("Record {}: Missing date", position));
        }
    }

    IntegrityReport::from_errors(errors)
}
