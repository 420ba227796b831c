//! Analytics summary over the stored dataset

use serde::{Deserialize, Serialize};

/// Summary statistics, recomputed from the full record set on each query
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    /// Number of stored records
    pub total_markets: usize,
    /// Sum of 2024 yearly totals
    pub total_sales_2024: u64,
    /// Mean 2022 → 2025 endpoint percentage change
    pub avg_growth_rate: f64,
    /// Share of records with `total > 0`, in percent
    pub market_penetration: f64,
    /// Records with `total > 0`
    pub active_markets: usize,
    /// Records with growth rate above 10%
    pub growth_markets: usize,
    /// Records with growth rate above 50%
    pub emerging_markets: usize,
}

impl AnalyticsSummary {
    /// Copy with the percentage fields rounded to one decimal place
    pub fn rounded(&self) -> Self {
        Self {
            avg_growth_rate: round_one_decimal(self.avg_growth_rate),
            market_penetration: round_one_decimal(self.market_penetration),
            ..*self
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounded_keeps_counts() {
        let summary = AnalyticsSummary {
            total_markets: 3,
            total_sales_2024: 42,
            avg_growth_rate: 33.333_333,
            market_penetration: 66.666_666,
            active_markets: 2,
            growth_markets: 1,
            emerging_markets: 1,
        };

        let rounded = summary.rounded();

        assert_eq!(rounded.avg_growth_rate, 33.3);
        assert_eq!(rounded.market_penetration, 66.7);
        assert_eq!(rounded.total_markets, 3);
        assert_eq!(rounded.total_sales_2024, 42);
    }

    #[test]
    fn test_serializes_dashboard_field_names() {
        let json = serde_json::to_value(AnalyticsSummary::default()).unwrap();
        for key in [
            "totalMarkets",
            "totalSales2024",
            "avgGrowthRate",
            "marketPenetration",
            "activeMarkets",
            "growthMarkets",
            "emergingMarkets",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }
}
