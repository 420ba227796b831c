//! Batch writer
//!
//! Replaces the store's entire contents with a validated set. Inserts run in
//! fixed-size chunks and the task yields between chunks, so other requests
//! keep being served during a large replace. Readers may observe an empty or
//! partially repopulated store meanwhile.

use crate::error::IngestError;
use crate::models::SalesData;
use crate::store::RecordStore;

/// Default records per chunk
pub const DEFAULT_BATCH_SIZE: usize = 1000;

#[derive(Clone)]
pub struct BatchWriter {
    store: RecordStore,
    batch_size: usize,
}

impl BatchWriter {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Set the chunk size (values below 1 are raised to 1)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Clear the store and insert `records` chunk by chunk
    ///
    /// An empty set fails with [`IngestError::NoValidRows`] before the store
    /// is touched. Returns the number of records inserted.
    pub async fn replace_all(&self, records: Vec<SalesData>) -> Result<usize, IngestError> {
        if records.is_empty() {
            return Err(IngestError::NoValidRows);
        }

        let total = records.len();
        self.store.clear().await;

        let mut inserted = 0usize;
        let mut remaining = records.into_iter().peekable();
        while remaining.peek().is_some() {
            let chunk: Vec<SalesData> = remaining.by_ref().take(self.batch_size).collect();
            inserted += self.store.insert_many(chunk).await.len();

            tracing::trace!(inserted, total, "Batch chunk written");
            tokio::task::yield_now().await;
        }

        Ok(inserted)
    }
}
