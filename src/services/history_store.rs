//! Bounded per-product price history
//!
//! History lives inside each TrackingRecord. The count bound is FIFO:
//! appending past `max_history` evicts the oldest entries. `prune`
//! applies an age window instead, for periodic cleanup rather than
//! per-append enforcement.

use crate::error::{Error, Result};
use crate::models::{HistoryEntry, TrackingRecord};
use crate::services::storage::EngineStorage;
use chrono::{Duration, Utc};
use tracing::debug;

pub struct HistoryStore {
    storage: EngineStorage,
    max_history: usize,
}

impl HistoryStore {
    pub fn new(storage: EngineStorage, max_history: usize) -> Self {
        Self {
            storage,
            max_history,
        }
    }

    /// The one place the count bound is enforced.
    ///
    /// The coordinator uses this on records it already holds in memory;
    /// `append` uses it on records loaded from storage.
    pub fn push_bounded(history: &mut Vec<HistoryEntry>, entry: HistoryEntry, max: usize) {
        history.push(entry);
        if history.len() > max {
            let excess = history.len() - max;
            history.drain(..excess);
        }
    }

    /// Load the product's record, append, truncate, write back.
    ///
    /// Creates the tracking record if this is the product's first entry.
    pub async fn append(&self, product_id: &str, entry: HistoryEntry) -> Result<()> {
        let mut tracking = self.storage.load_tracking().await;
        let record = tracking
            .entry(product_id.to_string())
            .or_insert_with(|| TrackingRecord::new(product_id.to_string(), entry.price));

        Self::push_bounded(&mut record.history, entry, self.max_history);
        self.storage.save_tracking(&tracking).await
    }

    /// History for a product, oldest first. Empty when untracked.
    pub async fn get(&self, product_id: &str) -> Vec<HistoryEntry> {
        self.storage
            .load_tracking()
            .await
            .get(product_id)
            .map(|record| record.history.clone())
            .unwrap_or_default()
    }

    /// Drop entries older than the age window.
    pub async fn prune(&self, product_id: &str, max_age_days: i64) -> Result<()> {
        let mut tracking = self.storage.load_tracking().await;
        let record = tracking
            .get_mut(product_id)
            .ok_or_else(|| Error::NotFound(format!("no tracking record for {}", product_id)))?;

        let cutoff = Utc::now() - Duration::days(max_age_days);
        let before = record.history.len();
        record.history.retain(|entry| entry.timestamp >= cutoff);

        if record.history.len() != before {
            debug!(
                product_id = product_id,
                removed = before - record.history.len(),
                max_age_days = max_age_days,
                "Pruned aged history entries"
            );
        }

        self.storage.save_tracking(&tracking).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::{JsonFileStore, KeyValueStore};
    use std::sync::Arc;

    fn history_store(dir: &tempfile::TempDir, max: usize) -> HistoryStore {
        let store: Arc<dyn KeyValueStore> =
            Arc::new(JsonFileStore::new(dir.path().join("store.json")));
        HistoryStore::new(EngineStorage::new(store), max)
    }

    #[test]
    fn test_push_bounded_evicts_oldest_first() {
        let max = 5;
        let mut history = Vec::new();
        for i in 0..=max {
            HistoryStore::push_bounded(&mut history, HistoryEntry::new(i as f64, false), max);
        }

        assert_eq!(history.len(), max);
        // Entry 0 is gone, entry 1 is now oldest
        assert_eq!(history[0].price, 1.0);
        assert_eq!(history[max - 1].price, max as f64);
    }

    #[test]
    fn test_push_bounded_under_limit_keeps_all() {
        let mut history = Vec::new();
        for i in 0..3 {
            HistoryStore::push_bounded(&mut history, HistoryEntry::new(i as f64, false), 10);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].price, 0.0);
    }

    #[tokio::test]
    async fn test_append_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = history_store(&dir, 10);

        store
            .append("p1", HistoryEntry::new(29.99, false))
            .await
            .unwrap();
        store
            .append("p1", HistoryEntry::new(24.99, true))
            .await
            .unwrap();

        let history = store.get("p1").await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].price, 29.99);
        assert!(history[1].dropped);
    }

    #[tokio::test]
    async fn test_append_enforces_bound_across_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let max = 4;
        let store = history_store(&dir, max);

        for i in 0..(max + 1) {
            store
                .append("p1", HistoryEntry::new(i as f64, false))
                .await
                .unwrap();
        }

        let history = store.get("p1").await;
        assert_eq!(history.len(), max);
        assert_eq!(history[0].price, 1.0);
    }

    #[tokio::test]
    async fn test_get_unknown_product_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = history_store(&dir, 10);
        assert!(store.get("missing").await.is_empty());
    }

    #[tokio::test]
    async fn test_prune_drops_aged_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = history_store(&dir, 10);

        let mut old_entry = HistoryEntry::new(10.0, false);
        old_entry.timestamp = Utc::now() - Duration::days(90);
        store.append("p1", old_entry).await.unwrap();
        store
            .append("p1", HistoryEntry::new(12.0, false))
            .await
            .unwrap();

        store.prune("p1", 30).await.unwrap();

        let history = store.get("p1").await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].price, 12.0);
    }

    #[tokio::test]
    async fn test_prune_unknown_product_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = history_store(&dir, 10);
        assert!(store.prune("missing", 30).await.is_err());
    }
}
