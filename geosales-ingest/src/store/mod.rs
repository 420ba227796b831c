//! In-memory record store
//!
//! The only shared mutable resource of the service. One handle is built at
//! startup and cloned into whichever component needs it; clones share the
//! same underlying map. Records are immutable once inserted: the store only
//! supports whole-set clear and append.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{SalesData, SalesRecord, SalesYear};

/// First id handed out after construction or `clear`
pub const INITIAL_ID: u64 = 1;

struct StoreInner {
    records: BTreeMap<u64, SalesRecord>,
    next_id: u64,
}

impl StoreInner {
    fn insert(&mut self, data: SalesData) -> SalesRecord {
        let id = self.next_id;
        self.next_id += 1;
        let record = SalesRecord { id, data };
        self.records.insert(id, record.clone());
        record
    }
}

impl Default for StoreInner {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
            next_id: INITIAL_ID,
        }
    }
}

/// Handle to the process-wide record store
#[derive(Clone, Default)]
pub struct RecordStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next id, store the record and return it
    pub async fn insert_one(&self, data: SalesData) -> SalesRecord {
        self.inner.write().await.insert(data)
    }

    /// Sequential `insert_one` under a single write lock
    pub async fn insert_many(&self, batch: Vec<SalesData>) -> Vec<SalesRecord> {
        let mut inner = self.inner.write().await;
        batch.into_iter().map(|data| inner.insert(data)).collect()
    }

    /// All records in id order
    pub async fn list_all(&self) -> Vec<SalesRecord> {
        self.inner.read().await.records.values().cloned().collect()
    }

    /// Records with non-zero sales in any of `years`; empty filter returns all
    pub async fn list_by_years(&self, years: &[SalesYear]) -> Vec<SalesRecord> {
        if years.is_empty() {
            return self.list_all().await;
        }

        self.inner
            .read()
            .await
            .records
            .values()
            .filter(|record| years.iter().any(|year| record.data.has_sales_in(*year)))
            .cloned()
            .collect()
    }

    /// Remove every record and reset the id counter
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.records.clear();
        inner.next_id = INITIAL_ID;
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, MonthlyValues, YearlyTotals};

    fn data(locality: &str, year: SalesYear, total: u64) -> SalesData {
        SalesData {
            region: "Region".to_string(),
            locality: locality.to_string(),
            district: String::new(),
            maker: String::new(),
            rto_code: String::new(),
            rto_name: String::new(),
            coordinates: Coordinates::SENTINEL,
            yearly: YearlyTotals::single(year, total),
            months: MonthlyValues::default(),
            total,
        }
    }

    #[tokio::test]
    async fn test_ids_are_monotonic_from_initial() {
        let store = RecordStore::new();

        let first = store.insert_one(data("A", SalesYear::Y2022, 1)).await;
        let rest = store
            .insert_many(vec![
                data("B", SalesYear::Y2023, 2),
                data("C", SalesYear::Y2024, 3),
            ])
            .await;

        assert_eq!(first.id, INITIAL_ID);
        assert_eq!(rest.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn test_clear_resets_counter() {
        let store = RecordStore::new();
        store.insert_one(data("A", SalesYear::Y2022, 1)).await;
        store.insert_one(data("B", SalesYear::Y2022, 1)).await;

        store.clear().await;
        assert!(store.is_empty().await);

        let record = store.insert_one(data("C", SalesYear::Y2022, 1)).await;
        assert_eq!(record.id, INITIAL_ID);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = RecordStore::new();
        let handle = store.clone();

        handle.insert_one(data("A", SalesYear::Y2025, 9)).await;

        assert_eq!(store.list_all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_list_by_years() {
        let store = RecordStore::new();
        store
            .insert_many(vec![
                data("A", SalesYear::Y2022, 10),
                data("B", SalesYear::Y2024, 20),
                data("C", SalesYear::Y2024, 0),
            ])
            .await;

        let only_2024 = store.list_by_years(&[SalesYear::Y2024]).await;
        assert_eq!(only_2024.len(), 1);
        assert_eq!(only_2024[0].data.locality, "B");

        let both = store
            .list_by_years(&[SalesYear::Y2022, SalesYear::Y2024])
            .await;
        assert_eq!(both.len(), 2);

        assert_eq!(store.list_by_years(&[]).await.len(), 3);
    }
}
