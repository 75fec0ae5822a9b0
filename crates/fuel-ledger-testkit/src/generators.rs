//! Proptest generators for property-based testing.

use proptest::prelude::*;

use fuel_ledger_core::{FuelRecord, RecordDraft, RecordId};

/// Generate a valid `YYYY-MM-DD` date string.
///
/// Days stop at 28 so every generated date exists in every month.
pub fn date() -> impl Strategy<Value = String> {
    (2020i32..=2030, 0u32..12, 1u32..=28)
        .prop_map(|(year, month0, day)| format!("{:04}-{:02}-{:02}", year, month0 + 1, day))
}

/// Generate a decimal amount string as a user would type one, or empty.
pub fn amount() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        (0u32..2000).prop_map(|whole| whole.to_string()),
        (0u32..2000, 0u32..100).prop_map(|(whole, cents)| format!("{}.{:02}", whole, cents)),
    ]
}

/// Generate a driver name.
pub fn driver_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,8} [A-Z][a-z]{2,8}"
}

/// Generate a UK-style truck registration.
pub fn truck_registration() -> impl Strategy<Value = String> {
    "[A-Z]{2}[0-9]{2} [A-Z]{3}"
}

/// Generate a complete record draft.
pub fn draft() -> impl Strategy<Value = RecordDraft> {
    (
        date(),
        driver_name(),
        truck_registration(),
        amount(),
        amount(),
        amount(),
        amount(),
        amount(),
    )
        .prop_map(
            |(date, driver, truck, diesel_added, diesel_price, adblue_added, adblue_price, other_cost)| {
                RecordDraft::new(date, driver, truck)
                    .diesel(diesel_added, diesel_price)
                    .adblue(adblue_added, adblue_price)
                    .other("Misc", other_cost)
            },
        )
}

/// Generate a stored record (fresh random id, fixed creation time).
pub fn record() -> impl Strategy<Value = FuelRecord> {
    draft().prop_map(|d| d.into_record(RecordId::generate(), "2024-01-01T00:00:00.000Z".to_string()))
}
