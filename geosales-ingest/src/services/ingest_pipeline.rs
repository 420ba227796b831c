//! Ingest pipeline
//!
//! raw rows → normalizer → geocode pool → validator → batch writer → store
//!
//! Row-level failures are absorbed by the stage that finds them and only
//! counted. The one batch-level failure is "no valid rows", reported before
//! the store is cleared so a bad upload never destroys existing data.
//! At most one ingest (or clear) runs at a time.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::PipelineSettings;
use crate::error::IngestError;
use crate::models::{IngestReport, RawRow, SalesData};
use crate::services::batch_writer::BatchWriter;
use crate::services::geocode_pool::GeocodePool;
use crate::services::geocoder::GeocodeProvider;
use crate::services::row_normalizer::{normalize_row, SkipReason};
use crate::services::schema_validator::validate;
use crate::store::RecordStore;

#[derive(Clone)]
pub struct IngestPipeline {
    pool: GeocodePool,
    writer: BatchWriter,
    store: RecordStore,
    writer_lock: Arc<Mutex<()>>,
}

impl IngestPipeline {
    pub fn new(store: RecordStore, provider: Arc<dyn GeocodeProvider>) -> Self {
        Self {
            pool: GeocodePool::new(provider),
            writer: BatchWriter::new(store.clone()),
            store,
            writer_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Pipeline configured from the `[pipeline]` TOML section
    pub fn from_settings(
        store: RecordStore,
        provider: Arc<dyn GeocodeProvider>,
        settings: &PipelineSettings,
        lookup_timeout: Duration,
    ) -> Self {
        Self::new(store, provider)
            .with_concurrency(settings.concurrency)
            .with_batch_size(settings.batch_size)
            .with_lookup_timeout(lookup_timeout)
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.pool = self.pool.with_concurrency(concurrency);
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.writer = self.writer.with_batch_size(batch_size);
        self
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.pool = self.pool.with_lookup_timeout(timeout);
        self
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Run the full pipeline and replace the stored dataset
    pub async fn ingest(&self, rows: Vec<RawRow>) -> Result<IngestReport, IngestError> {
        let _guard = self
            .writer_lock
            .try_lock()
            .map_err(|_| IngestError::AlreadyRunning)?;

        let ingest_id = Uuid::new_v4();
        let rows_received = rows.len();
        tracing::info!(
            ingest_id = %ingest_id,
            rows = rows_received,
            concurrency = self.pool.concurrency(),
            "Ingest started"
        );

        let mut rows_skipped = 0usize;
        let drafts: Vec<_> = rows
            .iter()
            .enumerate()
            .map(|(index, row)| match normalize_row(row) {
                Ok(draft) => Some(draft),
                Err(reason) => {
                    rows_skipped += 1;
                    log_skip(ingest_id, index, reason);
                    None
                }
            })
            .collect();

        let enriched = self.pool.enrich(drafts).await;

        let mut rows_rejected = 0usize;
        let mut geocode_failures = 0usize;
        let mut valid: Vec<SalesData> = Vec::with_capacity(enriched.len());
        for (index, candidate) in enriched.iter().enumerate() {
            let Some(candidate) = candidate else {
                continue;
            };
            match validate(candidate) {
                Ok(data) => {
                    if !candidate.is_geocoded() {
                        geocode_failures += 1;
                    }
                    valid.push(data);
                }
                Err(e) => {
                    rows_rejected += 1;
                    tracing::debug!(ingest_id = %ingest_id, row = index, error = %e, "Row rejected");
                }
            }
        }

        let inserted_count = match self.writer.replace_all(valid).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(
                    ingest_id = %ingest_id,
                    rows = rows_received,
                    skipped = rows_skipped,
                    rejected = rows_rejected,
                    "Ingest produced no valid rows, store left untouched"
                );
                return Err(e);
            }
        };

        let report = IngestReport {
            ingest_id,
            rows_received,
            rows_skipped,
            rows_rejected,
            geocode_failures,
            inserted_count,
        };

        tracing::info!(
            ingest_id = %ingest_id,
            inserted = report.inserted_count,
            skipped = report.rows_skipped,
            rejected = report.rows_rejected,
            geocode_failures = report.geocode_failures,
            "Ingest completed"
        );

        Ok(report)
    }

    /// Empty the store, waiting for any running ingest to finish first
    pub async fn clear(&self) {
        let _guard = self.writer_lock.lock().await;
        self.store.clear().await;
        tracing::info!("Sales data cleared");
    }
}

fn log_skip(ingest_id: Uuid, index: usize, reason: SkipReason) {
    tracing::debug!(ingest_id = %ingest_id, row = index, reason = ?reason, "Row skipped");
}
