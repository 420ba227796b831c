//! Geocode worker pool
//!
//! Drives normalized drafts through a [`GeocodeProvider`] with at most
//! `concurrency` lookups outstanding. Workers claim indices from a shared
//! atomic cursor and write each result into the write-once slot for that
//! index, so output order always matches input order no matter which lookup
//! finishes first.
//!
//! Workers are spawned tasks: if the caller stops awaiting the pool, the
//! lookups already in flight still run to completion.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::models::Coordinates;
use crate::services::geocoder::{GeocodeError, GeocodeProvider};
use crate::services::row_normalizer::RecordDraft;

/// Default number of concurrent workers
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Default per-lookup timeout
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Draft with coordinates attached
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedDraft {
    pub draft: RecordDraft,
    /// Resolved location, or [`Coordinates::SENTINEL`] when the lookup failed
    pub coordinates: Coordinates,
}

impl EnrichedDraft {
    pub fn is_geocoded(&self) -> bool {
        !self.coordinates.is_sentinel()
    }
}

/// Bounded-concurrency geocoding over an ordered batch
#[derive(Clone)]
pub struct GeocodePool {
    provider: Arc<dyn GeocodeProvider>,
    concurrency: usize,
    lookup_timeout: Duration,
}

impl GeocodePool {
    pub fn new(provider: Arc<dyn GeocodeProvider>) -> Self {
        Self {
            provider,
            concurrency: DEFAULT_CONCURRENCY,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Set the worker count (values below 1 are raised to 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Enrich every present draft, keeping positions
    ///
    /// `None` inputs (rows the normalizer skipped) stay `None` in the output.
    /// A failed or timed-out lookup keeps the row with sentinel coordinates.
    pub async fn enrich(&self, drafts: Vec<Option<RecordDraft>>) -> Vec<Option<EnrichedDraft>> {
        let total = drafts.len();
        if total == 0 {
            return Vec::new();
        }

        if !self.provider.is_configured() {
            tracing::warn!(
                rows = total,
                "Geocoding provider not configured, all rows keep sentinel coordinates"
            );
        }

        let drafts = Arc::new(drafts);
        let slots: Arc<Vec<OnceLock<Option<EnrichedDraft>>>> =
            Arc::new((0..total).map(|_| OnceLock::new()).collect());
        let cursor = Arc::new(AtomicUsize::new(0));

        let workers = self.concurrency.min(total);
        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let provider = Arc::clone(&self.provider);
            let drafts = Arc::clone(&drafts);
            let slots = Arc::clone(&slots);
            let cursor = Arc::clone(&cursor);
            let lookup_timeout = self.lookup_timeout;

            handles.push(tokio::spawn(async move {
                let mut processed = 0usize;
                loop {
                    let index = cursor.fetch_add(1, Ordering::Relaxed);
                    if index >= drafts.len() {
                        break;
                    }

                    let result = match &drafts[index] {
                        Some(draft) => {
                            Some(enrich_one(provider.as_ref(), draft, lookup_timeout).await)
                        }
                        None => None,
                    };

                    // Each index is claimed exactly once, so the slot is empty
                    let _ = slots[index].set(result);
                    processed += 1;
                }
                tracing::trace!(worker_id, processed, "Geocode worker finished");
            }));
        }

        for outcome in futures::future::join_all(handles).await {
            if let Err(e) = outcome {
                tracing::error!(error = %e, "Geocode worker task failed");
            }
        }

        // A slot left unset means its worker panicked mid-row; treat as absent
        slots
            .iter()
            .map(|slot| slot.get().cloned().flatten())
            .collect()
    }
}

async fn enrich_one(
    provider: &dyn GeocodeProvider,
    draft: &RecordDraft,
    lookup_timeout: Duration,
) -> EnrichedDraft {
    let coordinates = if provider.is_configured() {
        match lookup_with_timeout(provider, draft, lookup_timeout).await {
            Ok(coordinates) => coordinates,
            Err(e) => {
                tracing::debug!(
                    locality = %draft.locality,
                    region = %draft.region,
                    error = %e,
                    "Geocode lookup failed, using sentinel coordinates"
                );
                Coordinates::SENTINEL
            }
        }
    } else {
        Coordinates::SENTINEL
    };

    EnrichedDraft {
        draft: draft.clone(),
        coordinates,
    }
}

async fn lookup_with_timeout(
    provider: &dyn GeocodeProvider,
    draft: &RecordDraft,
    lookup_timeout: Duration,
) -> Result<Coordinates, GeocodeError> {
    tokio::time::timeout(lookup_timeout, provider.lookup(&draft.locality, &draft.region))
        .await
        .map_err(|_| GeocodeError::Timeout(lookup_timeout))?
}
