//! Schema validator
//!
//! Enforces the storage contract on an enriched draft. A draft that fails
//! any check is dropped whole; nothing partial reaches the store.

use thiserror::Error;

use crate::models::{MonthlyValues, SalesData, YearlyTotals};
use crate::services::geocode_pool::EnrichedDraft;

/// Storage contract violations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Region is empty")]
    EmptyRegion,

    #[error("Locality is empty")]
    EmptyLocality,

    #[error("Negative value {value} in {field}")]
    NegativeMeasure { field: &'static str, value: i64 },

    #[error("Coordinates out of range: ({latitude}, {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

const MONTH_FIELDS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Validate one enriched draft and build its insertable record
///
/// The resolved total is placed in the yearly field of the draft's year;
/// the other three years stay zero.
pub fn validate(candidate: &EnrichedDraft) -> Result<SalesData, ValidationError> {
    let draft = &candidate.draft;

    let region = draft.region.trim();
    if region.is_empty() {
        return Err(ValidationError::EmptyRegion);
    }
    let locality = draft.locality.trim();
    if locality.is_empty() {
        return Err(ValidationError::EmptyLocality);
    }

    let mut months = [0u64; 12];
    for ((slot, value), field) in months.iter_mut().zip(draft.months).zip(MONTH_FIELDS) {
        *slot = non_negative(field, value)?;
    }
    let total = non_negative("total", draft.total)?;

    let coordinates = candidate.coordinates;
    if !coordinates.latitude.is_finite()
        || !coordinates.longitude.is_finite()
        || !(-90.0..=90.0).contains(&coordinates.latitude)
        || !(-180.0..=180.0).contains(&coordinates.longitude)
    {
        return Err(ValidationError::InvalidCoordinates {
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        });
    }

    Ok(SalesData {
        region: region.to_string(),
        locality: locality.to_string(),
        district: draft.district.trim().to_string(),
        maker: draft.maker.trim().to_string(),
        rto_code: draft.rto_code.trim().to_string(),
        rto_name: draft.rto_name.trim().to_string(),
        coordinates,
        yearly: YearlyTotals::single(draft.year, total),
        months: MonthlyValues::from_array(months),
        total,
    })
}

fn non_negative(field: &'static str, value: i64) -> Result<u64, ValidationError> {
    u64::try_from(value).map_err(|_| ValidationError::NegativeMeasure { field, value })
}
