//! Test fixtures and helpers.
//!
//! Common setup code for ledger tests: minimal and fully populated drafts,
//! plus records with known totals for filter and aggregation scenarios.

use fuel_ledger_core::{FuelRecord, RecordDraft, RecordId};

/// A minimal valid draft for the given date.
pub fn draft_on(date: &str) -> RecordDraft {
    RecordDraft::new(date, "Jane Smith", "AB12 CDE")
}

/// A draft with every field populated.
pub fn full_draft(date: &str) -> RecordDraft {
    RecordDraft::new(date, "Jane Smith", "AB12 CDE")
        .mileage("120000")
        .diesel("150.5", "1.45")
        .adblue("10", "0.80")
        .other("Screen wash", "6.50")
        .signature("Jane Smith", "01/07/2024, 09:15:00")
        .receipt_image("data:image/png;base64,iVBORw0KGgo=")
}

/// A stored record on `date` whose grand total is exactly `grand_total`.
///
/// Routes the amount through the other-expenses line so the arithmetic
/// stays exact for assertions.
pub fn record_totalling(date: &str, grand_total: f64) -> FuelRecord {
    RecordDraft::new(date, "Jane Smith", "AB12 CDE")
        .other("Misc", format!("{}", grand_total))
        .into_record(RecordId::generate(), format!("{}T00:00:00.000Z", date))
}

/// A stored record for `driver` and `truck` with a diesel line.
pub fn record_for(date: &str, driver: &str, truck: &str, added: &str, price: &str) -> FuelRecord {
    RecordDraft::new(date, driver, truck)
        .diesel(added, price)
        .into_record(RecordId::generate(), format!("{}T00:00:00.000Z", date))
}
