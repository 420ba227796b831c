//! Row normalizer
//!
//! Turns a raw spreadsheet row into a canonical [`RecordDraft`], or skips
//! it. Header casing and surrounding whitespace are ignored. Skips are
//! never errors: the caller only counts them.

use serde_json::Value;
use std::collections::HashMap;

use crate::models::{RawRow, SalesYear, MONTH_CODES};

const YEAR_COLUMNS: &[&str] = &["year"];
const REGION_COLUMNS: &[&str] = &["state", "region"];
const LOCALITY_COLUMNS: &[&str] = &["city", "locality"];
const DISTRICT_COLUMNS: &[&str] = &["district"];
const MAKER_COLUMNS: &[&str] = &["maker", "brand"];
const RTO_CODE_COLUMNS: &[&str] = &["rto code", "rto_code", "rto"];
const RTO_NAME_COLUMNS: &[&str] = &["rto name", "rto_name"];
const TOTAL_COLUMNS: &[&str] = &["total"];

/// Normalized row, not yet geocoded or validated
///
/// Measures are signed here: the normalizer coerces but does not judge
/// values, negative ones are rejected by the schema validator.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
    pub year: SalesYear,
    pub region: String,
    pub locality: String,
    pub district: String,
    pub maker: String,
    pub rto_code: String,
    pub rto_name: String,
    /// Monthly values in calendar order
    pub months: [i64; 12],
    /// Explicit `total` column when numeric, else the monthly sum
    pub total: i64,
}

/// Why a row was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Year column missing, non-numeric or outside 2022..=2025
    UnsupportedYear,
    /// Region column missing or blank
    MissingRegion,
    /// Locality column missing or blank
    MissingLocality,
    /// Monthly values too large to total
    MeasureOverflow,
}

/// Normalize one row
pub fn normalize_row(row: &RawRow) -> Result<RecordDraft, SkipReason> {
    let columns = canonical_columns(row);

    let year = lookup(&columns, YEAR_COLUMNS)
        .and_then(cell_integer)
        .and_then(SalesYear::from_year)
        .ok_or(SkipReason::UnsupportedYear)?;

    let mut months = [0i64; 12];
    for (slot, code) in months.iter_mut().zip(MONTH_CODES) {
        *slot = columns
            .get(code)
            .and_then(|value| cell_integer(value))
            .unwrap_or(0);
    }
    let total = match lookup(&columns, TOTAL_COLUMNS).and_then(cell_integer) {
        Some(total) => total,
        None => checked_sum(&months).ok_or(SkipReason::MeasureOverflow)?,
    };

    let region = text(&columns, REGION_COLUMNS);
    if region.is_empty() {
        return Err(SkipReason::MissingRegion);
    }
    let locality = text(&columns, LOCALITY_COLUMNS);
    if locality.is_empty() {
        return Err(SkipReason::MissingLocality);
    }

    Ok(RecordDraft {
        year,
        region,
        locality,
        district: text(&columns, DISTRICT_COLUMNS),
        maker: text(&columns, MAKER_COLUMNS),
        rto_code: text(&columns, RTO_CODE_COLUMNS),
        rto_name: text(&columns, RTO_NAME_COLUMNS),
        months,
        total,
    })
}

/// Lowercased, trimmed header → cell
///
/// Headers that collide after canonicalization keep the first non-empty
/// cell in raw header order.
fn canonical_columns(row: &RawRow) -> HashMap<String, &Value> {
    let mut columns: HashMap<String, &Value> = HashMap::new();
    for (key, value) in row.iter() {
        let canonical = key.trim().to_lowercase();
        match columns.get(&canonical) {
            None => {
                columns.insert(canonical, value);
            }
            Some(existing) => {
                tracing::debug!(column = %canonical, header = %key, "Duplicate column header");
                if cell_text(existing).is_empty() && !cell_text(value).is_empty() {
                    columns.insert(canonical, value);
                }
            }
        }
    }
    columns
}

fn checked_sum(values: &[i64]) -> Option<i64> {
    values.iter().try_fold(0i64, |acc, value| acc.checked_add(*value))
}

/// First non-empty cell among the alias columns
fn lookup<'a>(columns: &HashMap<String, &'a Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| columns.get(*alias).copied())
        .find(|value| !cell_text(value).is_empty())
}

fn text(columns: &HashMap<String, &Value>, aliases: &[&str]) -> String {
    lookup(columns, aliases).map(cell_text).unwrap_or_default()
}

/// Integer value of a cell
///
/// Numbers are truncated toward zero. Strings are read by their leading
/// integer (`" 42 units"` → 42, `"12.9"` → 12); a string without leading
/// digits is not numeric.
pub fn cell_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => leading_integer(s),
        _ => None,
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Trimmed text of a cell; integral numbers print without a fraction
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(number) => match number.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => number.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_row() -> RawRow {
        RawRow::new()
            .with("Year", 2024)
            .with(" State ", "Kerala")
            .with("CITY", "Kochi")
            .with("District", "Ernakulam")
            .with("Maker", "Acme")
            .with("RTO Code", "KL07")
            .with("RTO Name", "Ernakulam RTO")
    }

    #[test]
    fn test_headers_are_case_and_space_insensitive() {
        let draft = normalize_row(&base_row()).unwrap();

        assert_eq!(draft.year, SalesYear::Y2024);
        assert_eq!(draft.region, "Kerala");
        assert_eq!(draft.locality, "Kochi");
        assert_eq!(draft.district, "Ernakulam");
        assert_eq!(draft.maker, "Acme");
        assert_eq!(draft.rto_code, "KL07");
        assert_eq!(draft.rto_name, "Ernakulam RTO");
    }

    #[test]
    fn test_unsupported_years_skip() {
        for year in [json!(2021), json!(2099), json!("abc"), json!(null)] {
            let row = base_row().with("Year", year);
            assert_eq!(normalize_row(&row), Err(SkipReason::UnsupportedYear));
        }
        let row = base_row().with("Year", "2023");
        assert_eq!(normalize_row(&row).unwrap().year, SalesYear::Y2023);
    }

    #[test]
    fn test_missing_year_column_skips() {
        let mut row = base_row();
        row.0.remove("Year");
        assert_eq!(normalize_row(&row), Err(SkipReason::UnsupportedYear));
    }

    #[test]
    fn test_missing_region_or_locality_skips() {
        let row = base_row().with(" State ", "  ");
        assert_eq!(normalize_row(&row), Err(SkipReason::MissingRegion));

        let mut row = base_row();
        row.0.remove("CITY");
        assert_eq!(normalize_row(&row), Err(SkipReason::MissingLocality));
    }

    #[test]
    fn test_months_coerce_and_sum() {
        let row = base_row()
            .with("JAN", 10)
            .with("feb", "20")
            .with("Mar", 5.7)
            .with("APR", "n/a")
            .with("DEC", 65);

        let draft = normalize_row(&row).unwrap();

        assert_eq!(draft.months[0], 10);
        assert_eq!(draft.months[1], 20);
        assert_eq!(draft.months[2], 5);
        assert_eq!(draft.months[3], 0);
        assert_eq!(draft.months[11], 65);
        assert_eq!(draft.total, 100);
    }

    #[test]
    fn test_explicit_total_wins() {
        let row = base_row().with("JAN", 10).with("Total", 250);
        assert_eq!(normalize_row(&row).unwrap().total, 250);

        let row = base_row().with("JAN", 10).with("total", "");
        assert_eq!(normalize_row(&row).unwrap().total, 10);

        let row = base_row().with("JAN", 10).with("TOTAL", "pending");
        assert_eq!(normalize_row(&row).unwrap().total, 10);
    }

    #[test]
    fn test_month_total_overflow_skips() {
        let row = base_row().with("JAN", i64::MAX).with("FEB", i64::MAX);
        assert_eq!(normalize_row(&row), Err(SkipReason::MeasureOverflow));

        // An explicit total means the months are never summed
        let row = row.with("Total", 7);
        assert_eq!(normalize_row(&row).unwrap().total, 7);
    }

    #[test]
    fn test_colliding_headers_resolve_deterministically() {
        // "Year" sorts before "year "; the blank cell loses to the filled one
        let row = base_row().with("Year", "").with("year ", 2025);
        for _ in 0..10 {
            assert_eq!(normalize_row(&row).unwrap().year, SalesYear::Y2025);
        }

        // Both filled: first in header order wins
        let row = base_row().with("CITY", "Kochi").with("city", "Aluva");
        assert_eq!(normalize_row(&row).unwrap().locality, "Kochi");
    }

    #[test]
    fn test_region_alias_and_numeric_text() {
        let row = RawRow::new()
            .with("year", 2022)
            .with("region", "Goa")
            .with("locality", "Panaji")
            .with("rto", 7);

        let draft = normalize_row(&row).unwrap();

        assert_eq!(draft.region, "Goa");
        assert_eq!(draft.locality, "Panaji");
        assert_eq!(draft.rto_code, "7");
    }

    #[test]
    fn test_cell_integer_parsing() {
        assert_eq!(cell_integer(&json!(" 42 units")), Some(42));
        assert_eq!(cell_integer(&json!("-3")), Some(-3));
        assert_eq!(cell_integer(&json!("12.9")), Some(12));
        assert_eq!(cell_integer(&json!(-2.5)), Some(-2));
        assert_eq!(cell_integer(&json!("x1")), None);
        assert_eq!(cell_integer(&json!("-")), None);
        assert_eq!(cell_integer(&json!(true)), None);
    }
}
