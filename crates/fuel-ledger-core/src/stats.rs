//! Derived statistics over record collections.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::record::{parse_amount, round2, FuelRecord};

/// Count and spending total for one driver or truck grouping.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupTotal {
    pub count: usize,
    pub total: f64,
}

/// Aggregate figures for a set of records, typically one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    pub total_records: usize,
    pub total_diesel_litres: f64,
    pub total_adblue_litres: f64,
    pub total_diesel_cost: f64,
    pub total_adblue_cost: f64,
    pub total_other_cost: f64,
    pub total_spending: f64,
    /// Mean of the diesel prices carried by records that have one; 0 when
    /// none do.
    pub avg_diesel_price: f64,
    pub avg_adblue_price: f64,
    pub by_driver: BTreeMap<String, GroupTotal>,
    pub by_truck: BTreeMap<String, GroupTotal>,
}

/// Compute aggregate statistics for the given records.
pub fn monthly_stats(records: &[FuelRecord]) -> MonthlyStats {
    let mut stats = MonthlyStats {
        total_records: records.len(),
        total_diesel_litres: 0.0,
        total_adblue_litres: 0.0,
        total_diesel_cost: 0.0,
        total_adblue_cost: 0.0,
        total_other_cost: 0.0,
        total_spending: 0.0,
        avg_diesel_price: 0.0,
        avg_adblue_price: 0.0,
        by_driver: BTreeMap::new(),
        by_truck: BTreeMap::new(),
    };

    let mut diesel_price_sum = 0.0;
    let mut diesel_priced = 0usize;
    let mut adblue_price_sum = 0.0;
    let mut adblue_priced = 0usize;

    for record in records {
        stats.total_diesel_litres += parse_amount(&record.diesel_added);
        stats.total_adblue_litres += parse_amount(&record.adblue_added);
        stats.total_diesel_cost += record.diesel_total;
        stats.total_adblue_cost += record.adblue_total;
        stats.total_other_cost += record.other_total;
        stats.total_spending += record.grand_total;

        if !record.diesel_price.is_empty() {
            diesel_price_sum += parse_amount(&record.diesel_price);
            diesel_priced += 1;
        }
        if !record.adblue_price.is_empty() {
            adblue_price_sum += parse_amount(&record.adblue_price);
            adblue_priced += 1;
        }

        let driver = stats.by_driver.entry(record.driver_name.clone()).or_default();
        driver.count += 1;
        driver.total += record.grand_total;

        let truck = stats
            .by_truck
            .entry(record.truck_registration.clone())
            .or_default();
        truck.count += 1;
        truck.total += record.grand_total;
    }

    stats.total_diesel_litres = round2(stats.total_diesel_litres);
    stats.total_adblue_litres = round2(stats.total_adblue_litres);
    stats.total_diesel_cost = round2(stats.total_diesel_cost);
    stats.total_adblue_cost = round2(stats.total_adblue_cost);
    stats.total_other_cost = round2(stats.total_other_cost);
    stats.total_spending = round2(stats.total_spending);

    if stats.total_diesel_litres > 0.0 && diesel_priced > 0 {
        stats.avg_diesel_price = round2(diesel_price_sum / diesel_priced as f64);
    }
    if stats.total_adblue_litres > 0.0 && adblue_priced > 0 {
        stats.avg_adblue_price = round2(adblue_price_sum / adblue_priced as f64);
    }

    stats
}

/// Bookkeeping counters for the stored collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageStats {
    pub total_records: usize,
    pub submitted_records: usize,
    pub pending_records: usize,
    /// Size in bytes of the serialized record collection.
    pub storage_used_bytes: usize,
}

/// Compute storage counters for the given records.
pub fn storage_stats(records: &[FuelRecord]) -> Result<StorageStats> {
    let submitted_records = records.iter().filter(|r| r.submitted_in_batch).count();
    let serialized = serde_json::to_string(records)?;

    Ok(StorageStats {
        total_records: records.len(),
        submitted_records,
        pending_records: records.len() - submitted_records,
        storage_used_bytes: serialized.len(),
    })
}
