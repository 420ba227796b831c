//! Analytics aggregator
//!
//! Pure functions over the stored record set. Growth is the simple endpoint
//! percentage change from 2022 to 2025. The dashboard copy calls it a
//! compound annual rate; the numbers are not compounded.

use crate::models::{AnalyticsSummary, SalesData, SalesRecord};

/// Growth threshold (percent) for a "growing" market
pub const GROWTH_THRESHOLD: f64 = 10.0;

/// Growth threshold (percent) for an "emerging" market
pub const EMERGING_THRESHOLD: f64 = 50.0;

/// 2022 → 2025 percentage change with zero-base special cases
///
/// - 2022 = 0 and 2025 = 0 → 0
/// - 2022 = 0 and 2025 > 0 → 100
/// - otherwise `(2025 - 2022) / 2022 * 100`
pub fn growth_rate(data: &SalesData) -> f64 {
    let start = data.yearly.sales_2022 as f64;
    let end = data.yearly.sales_2025 as f64;

    if data.yearly.sales_2022 == 0 {
        if data.yearly.sales_2025 == 0 {
            0.0
        } else {
            100.0
        }
    } else {
        (end - start) / start * 100.0
    }
}

/// Summarize the full record set
pub fn summarize(records: &[SalesRecord]) -> AnalyticsSummary {
    let total_markets = records.len();
    if total_markets == 0 {
        return AnalyticsSummary::default();
    }

    // Saturates rather than wrapping on pathological totals
    let total_sales_2024 = records
        .iter()
        .map(|r| r.data.yearly.sales_2024)
        .fold(0u64, u64::saturating_add);

    let rates: Vec<f64> = records.iter().map(|r| growth_rate(&r.data)).collect();
    let finite: Vec<f64> = rates.iter().copied().filter(|rate| rate.is_finite()).collect();
    let avg_growth_rate = if finite.is_empty() {
        0.0
    } else {
        finite.iter().sum::<f64>() / finite.len() as f64
    };

    let active_markets = records.iter().filter(|r| r.data.total > 0).count();
    let growth_markets = rates.iter().filter(|rate| **rate > GROWTH_THRESHOLD).count();
    let emerging_markets = rates.iter().filter(|rate| **rate > EMERGING_THRESHOLD).count();

    let market_penetration = active_markets as f64 / total_markets as f64 * 100.0;

    AnalyticsSummary {
        total_markets,
        total_sales_2024,
        avg_growth_rate,
        market_penetration,
        active_markets,
        growth_markets,
        emerging_markets,
    }
}
