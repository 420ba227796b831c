//! Test helper utilities
//!
//! Deterministic geocode providers and row builders shared by the
//! integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use geosales_ingest::models::{Coordinates, RawRow};
use geosales_ingest::services::{GeocodeError, GeocodeProvider, IngestPipeline};
use geosales_ingest::store::RecordStore;

/// Resolves localities from a fixed table; unknown localities fail
#[derive(Debug, Default)]
pub struct FixedGeocoder {
    table: HashMap<String, Coordinates>,
}

impl FixedGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locality: &str, latitude: f64, longitude: f64) -> Self {
        self.table
            .insert(locality.to_string(), Coordinates::new(latitude, longitude));
        self
    }
}

#[async_trait]
impl GeocodeProvider for FixedGeocoder {
    fn is_configured(&self) -> bool {
        true
    }

    async fn lookup(&self, locality: &str, _region: &str) -> Result<Coordinates, GeocodeError> {
        self.table
            .get(locality)
            .copied()
            .ok_or_else(|| GeocodeError::NoMatch(locality.to_string()))
    }
}

/// Fails every lookup, as an unreachable provider would
#[derive(Debug, Default)]
pub struct FailingGeocoder;

#[async_trait]
impl GeocodeProvider for FailingGeocoder {
    fn is_configured(&self) -> bool {
        true
    }

    async fn lookup(&self, _locality: &str, _region: &str) -> Result<Coordinates, GeocodeError> {
        Err(GeocodeError::NetworkError("connection refused".to_string()))
    }
}

/// Sleeps before answering and records peak concurrency
#[derive(Debug)]
pub struct SlowGeocoder {
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl SlowGeocoder {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeocodeProvider for SlowGeocoder {
    fn is_configured(&self) -> bool {
        true
    }

    async fn lookup(&self, _locality: &str, _region: &str) -> Result<Coordinates, GeocodeError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(Coordinates::new(10.0, 76.0))
    }
}

/// Answers `L<n>` after `(rows - n) * step`, so later rows finish first
///
/// Coordinates encode `n` as `(n + 1, n + 1)`.
#[derive(Debug)]
pub struct StaggeredGeocoder {
    rows: u64,
    step: Duration,
}

impl StaggeredGeocoder {
    pub fn new(rows: u64, step: Duration) -> Self {
        Self { rows, step }
    }

    pub fn coordinates_for(n: usize) -> Coordinates {
        Coordinates::new(n as f64 + 1.0, n as f64 + 1.0)
    }
}

#[async_trait]
impl GeocodeProvider for StaggeredGeocoder {
    fn is_configured(&self) -> bool {
        true
    }

    async fn lookup(&self, locality: &str, _region: &str) -> Result<Coordinates, GeocodeError> {
        let n: u64 = locality
            .trim_start_matches('L')
            .parse()
            .map_err(|_| GeocodeError::NoMatch(locality.to_string()))?;
        let remaining = self.rows.saturating_sub(n) as u32;
        tokio::time::sleep(self.step * remaining).await;
        Ok(Self::coordinates_for(n as usize))
    }
}

/// Counts lookups per locality
#[derive(Debug, Default)]
pub struct CountingGeocoder {
    calls: std::sync::Mutex<HashMap<String, usize>>,
}

impl CountingGeocoder {
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn calls_for(&self, locality: &str) -> usize {
        self.calls.lock().unwrap().get(locality).copied().unwrap_or(0)
    }
}

#[async_trait]
impl GeocodeProvider for CountingGeocoder {
    fn is_configured(&self) -> bool {
        true
    }

    async fn lookup(&self, locality: &str, _region: &str) -> Result<Coordinates, GeocodeError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(locality.to_string())
            .or_insert(0) += 1;
        Ok(Coordinates::new(20.0, 80.0))
    }
}

/// Row with year, region, locality and the given month values from JAN
pub fn sales_row(year: i64, region: &str, locality: &str, months: &[i64]) -> RawRow {
    const CODES: [&str; 12] = [
        "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
    ];
    months
        .iter()
        .zip(CODES)
        .fold(
            RawRow::new()
                .with("Year", year)
                .with("State", region)
                .with("City", locality),
            |row, (value, code)| row.with(code, *value),
        )
}

/// Pipeline over a fresh store
pub fn pipeline_with(provider: Arc<dyn GeocodeProvider>) -> (IngestPipeline, RecordStore) {
    let store = RecordStore::new();
    (IngestPipeline::new(store.clone(), provider), store)
}
