//! Sales record model
//!
//! A record is one enriched, validated sales observation for a single
//! locality and year. JSON field names follow the dashboard's contract
//! (`state`, `city`, `sales2022`, month keys `JAN`..`DEC`).

use serde::{Deserialize, Serialize};

/// Three-letter month codes in calendar order, lowercase
pub const MONTH_CODES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// The sales years a record can represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SalesYear {
    Y2022,
    Y2023,
    Y2024,
    Y2025,
}

impl SalesYear {
    pub const ALL: [SalesYear; 4] = [
        SalesYear::Y2022,
        SalesYear::Y2023,
        SalesYear::Y2024,
        SalesYear::Y2025,
    ];

    /// Map a calendar year; anything outside 2022..=2025 is `None`
    pub fn from_year(year: i64) -> Option<Self> {
        match year {
            2022 => Some(SalesYear::Y2022),
            2023 => Some(SalesYear::Y2023),
            2024 => Some(SalesYear::Y2024),
            2025 => Some(SalesYear::Y2025),
            _ => None,
        }
    }
}

/// Latitude/longitude pair
///
/// `(0, 0)` is the "not geocoded" sentinel and must never be treated as a
/// real location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const SENTINEL: Coordinates = Coordinates {
        latitude: 0.0,
        longitude: 0.0,
    };

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

/// Yearly totals, one field per supported year
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyTotals {
    #[serde(default)]
    pub sales_2022: u64,
    #[serde(default)]
    pub sales_2023: u64,
    #[serde(default)]
    pub sales_2024: u64,
    #[serde(default)]
    pub sales_2025: u64,
}

impl YearlyTotals {
    /// Totals with `value` in `year` and zero elsewhere
    pub fn single(year: SalesYear, value: u64) -> Self {
        let mut totals = Self::default();
        *totals.slot_mut(year) = value;
        totals
    }

    pub fn get(&self, year: SalesYear) -> u64 {
        match year {
            SalesYear::Y2022 => self.sales_2022,
            SalesYear::Y2023 => self.sales_2023,
            SalesYear::Y2024 => self.sales_2024,
            SalesYear::Y2025 => self.sales_2025,
        }
    }

    fn slot_mut(&mut self, year: SalesYear) -> &mut u64 {
        match year {
            SalesYear::Y2022 => &mut self.sales_2022,
            SalesYear::Y2023 => &mut self.sales_2023,
            SalesYear::Y2024 => &mut self.sales_2024,
            SalesYear::Y2025 => &mut self.sales_2025,
        }
    }

    /// Number of years carrying a non-zero total
    pub fn non_zero_count(&self) -> usize {
        SalesYear::ALL
            .iter()
            .filter(|year| self.get(**year) > 0)
            .count()
    }
}

/// Twelve monthly values for the year the source row represents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct MonthlyValues {
    #[serde(default)]
    pub jan: u64,
    #[serde(default)]
    pub feb: u64,
    #[serde(default)]
    pub mar: u64,
    #[serde(default)]
    pub apr: u64,
    #[serde(default)]
    pub may: u64,
    #[serde(default)]
    pub jun: u64,
    #[serde(default)]
    pub jul: u64,
    #[serde(default)]
    pub aug: u64,
    #[serde(default)]
    pub sep: u64,
    #[serde(default)]
    pub oct: u64,
    #[serde(default)]
    pub nov: u64,
    #[serde(default)]
    pub dec: u64,
}

impl MonthlyValues {
    pub fn from_array(values: [u64; 12]) -> Self {
        let [jan, feb, mar, apr, may, jun, jul, aug, sep, oct, nov, dec] = values;
        Self {
            jan,
            feb,
            mar,
            apr,
            may,
            jun,
            jul,
            aug,
            sep,
            oct,
            nov,
            dec,
        }
    }

    pub fn to_array(&self) -> [u64; 12] {
        [
            self.jan, self.feb, self.mar, self.apr, self.may, self.jun, self.jul, self.aug,
            self.sep, self.oct, self.nov, self.dec,
        ]
    }
}

/// Insertable record: everything except the store-assigned id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesData {
    #[serde(rename = "state")]
    pub region: String,
    #[serde(rename = "city")]
    pub locality: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub maker: String,
    #[serde(default)]
    pub rto_code: String,
    #[serde(default)]
    pub rto_name: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    #[serde(flatten)]
    pub yearly: YearlyTotals,
    #[serde(flatten)]
    pub months: MonthlyValues,
    #[serde(default)]
    pub total: u64,
}

impl SalesData {
    /// True when the record has a positive total in `year`
    pub fn has_sales_in(&self, year: SalesYear) -> bool {
        self.yearly.get(year) > 0
    }
}

/// Stored record with its immutable identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub id: u64,
    #[serde(flatten)]
    pub data: SalesData,
}
