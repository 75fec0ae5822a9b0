//! Pure exporters: CSV and JSON renderings of the record collection.
//!
//! Both are stateless leaves over a record slice; persistence and ordering
//! are the caller's concern.

use crate::error::Result;
use crate::record::FuelRecord;

/// CSV header row, in the exact column order downstream consumers rely on.
pub const CSV_HEADERS: [&str; 14] = [
    "Date",
    "Driver Name",
    "Truck Registration",
    "Mileage (km)",
    "Diesel (L)",
    "Diesel Price (£)",
    "Diesel Total (£)",
    "AdBlue (L)",
    "AdBlue Price (£)",
    "AdBlue Total (£)",
    "Other Expenses",
    "Other Cost (£)",
    "Grand Total (£)",
    "Signature Timestamp",
];

/// Render the record collection as CSV.
///
/// Empty collection renders as the empty string. Totals are formatted to
/// 2 dp; optional descriptive fields fall back to `N/A`, raw amounts and
/// prices to `0`. Fields are quoted per RFC 4180 when they contain a
/// comma, quote, or line break.
pub fn records_to_csv(records: &[FuelRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADERS.join(","));

    for record in records {
        let row = [
            csv_field(&record.date),
            csv_field(&record.driver_name),
            csv_field(&record.truck_registration),
            csv_field(or_fallback(&record.mileage, "N/A")),
            csv_field(or_fallback(&record.diesel_added, "0")),
            csv_field(or_fallback(&record.diesel_price, "0")),
            format!("{:.2}", record.diesel_total),
            csv_field(or_fallback(&record.adblue_added, "0")),
            csv_field(or_fallback(&record.adblue_price, "0")),
            format!("{:.2}", record.adblue_total),
            csv_field(or_fallback(&record.other_expenses, "N/A")),
            format!("{:.2}", record.other_total),
            format!("{:.2}", record.grand_total),
            csv_field(&record.signature_timestamp),
        ];
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Render the record collection as pretty-printed JSON, verbatim field
/// names.
pub fn records_to_json(records: &[FuelRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// RFC 4180 quoting: wrap the field in quotes and double inner quotes when
/// it contains a separator or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
