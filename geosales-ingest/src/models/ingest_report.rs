//! Ingest run outcome

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Counters for one successful ingest run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    /// Correlates log lines of one run
    pub ingest_id: Uuid,
    /// Rows handed to the pipeline
    pub rows_received: usize,
    /// Rows dropped by the normalizer (bad year, missing region/locality)
    pub rows_skipped: usize,
    /// Rows dropped by the schema validator
    pub rows_rejected: usize,
    /// Rows stored with sentinel coordinates
    pub geocode_failures: usize,
    /// Records written to the store
    pub inserted_count: usize,
}
