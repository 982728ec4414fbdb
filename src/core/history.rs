//! Persisted, bounded history of past calculations

use crate::core::revaluation::RevaluationResult;
use crate::store::{KeyValueBackend, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Upper bound on stored entries; saves beyond it evict the oldest.
pub const MAX_HISTORY_ITEMS: usize = 50;

const HISTORY_KEY: &str = "calculations";

/// A saved calculation. `id` and `timestamp` are assigned at save time;
/// `timestamp` may differ from the result's `computed_at`. Entries are
/// never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub result: RevaluationResult,
}

/// Size-bounded, insertion-ordered store of past calculations, persisted
/// under a single key as one JSON document.
///
/// Every operation is a whole-list read-modify-write cycle. There is no
/// locking or versioning: a single logical caller at a time is assumed, and
/// concurrent writers would race with last-write-wins on the persisted
/// blob. Reads degrade to an empty history; write failures propagate, since
/// a lost save is user-visible data loss.
pub struct HistoryStore {
    backend: Arc<dyn KeyValueBackend>,
}

impl HistoryStore {
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self { backend }
    }

    /// Saves a calculation, evicting the oldest entries beyond
    /// [`MAX_HISTORY_ITEMS`], and returns the stored entry.
    pub async fn save(&self, result: &RevaluationResult) -> Result<HistoryEntry, StoreError> {
        let mut entries = self.list().await;

        let entry = HistoryEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            result: result.clone(),
        };

        entries.insert(0, entry.clone());
        entries.truncate(MAX_HISTORY_ITEMS);

        self.persist(&entries).await?;
        Ok(entry)
    }

    /// The persisted entries, most recent first. A failed or unreadable
    /// read yields an empty history rather than an error.
    pub async fn list(&self) -> Vec<HistoryEntry> {
        let raw = match self.backend.get(HISTORY_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read history, treating as empty: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Stored history is not decodable, treating as empty: {e}");
                Vec::new()
            }
        }
    }

    /// Removes the entry with the given id, if any, and returns the
    /// remaining entries. An absent id is a no-op, not an error.
    pub async fn delete(&self, id: &str) -> Result<Vec<HistoryEntry>, StoreError> {
        let mut entries = self.list().await;
        entries.retain(|entry| entry.id != id);
        self.persist(&entries).await?;
        Ok(entries)
    }

    /// Drops the whole persisted collection.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.backend.remove(HISTORY_KEY).await
    }

    async fn persist(&self, entries: &[HistoryEntry]) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(entries)?;
        self.backend.set(HISTORY_KEY, &encoded).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryCollection;
    use async_trait::async_trait;
    use chrono::Utc;

    fn sample_result(amount: f64) -> RevaluationResult {
        RevaluationResult {
            original_amount: amount,
            revalued_amount: amount * 1.3,
            difference: amount * 0.3,
            percent_change: 30.0,
            start_period: "Gennaio 2010".to_string(),
            end_period: "Giugno 2024".to_string(),
            start_index: 100.0,
            end_index: 130.0,
            computed_at: Utc::now(),
        }
    }

    fn memory_store() -> HistoryStore {
        HistoryStore::new(Arc::new(MemoryCollection::new()))
    }

    #[tokio::test]
    async fn save_prepends_most_recent_first() {
        let store = memory_store();

        store.save(&sample_result(100.0)).await.unwrap();
        store.save(&sample_result(200.0)).await.unwrap();
        store.save(&sample_result(300.0)).await.unwrap();

        let entries = store.list().await;
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].result.original_amount, 300.0);
        assert_eq!(entries[1].result.original_amount, 200.0);
        assert_eq!(entries[2].result.original_amount, 100.0);
    }

    #[tokio::test]
    async fn save_assigns_unique_ids() {
        let store = memory_store();
        let first = store.save(&sample_result(1.0)).await.unwrap();
        let second = store.save(&sample_result(1.0)).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn history_is_bounded_and_keeps_newest() {
        let store = memory_store();

        for i in 0..60 {
            store.save(&sample_result(f64::from(i))).await.unwrap();
        }

        let entries = store.list().await;
        assert_eq!(entries.len(), MAX_HISTORY_ITEMS);
        // Newest save first, the ten oldest evicted.
        assert_eq!(entries[0].result.original_amount, 59.0);
        assert_eq!(entries[49].result.original_amount, 10.0);
    }

    #[tokio::test]
    async fn entries_round_trip_through_persistence() {
        let backend = Arc::new(MemoryCollection::new());
        let saved = {
            let store = HistoryStore::new(Arc::clone(&backend) as Arc<dyn KeyValueBackend>);
            store.save(&sample_result(42.5)).await.unwrap()
        };

        // A fresh store over the same backend sees the identical entry,
        // timestamps included.
        let store = HistoryStore::new(backend);
        let entries = store.list().await;
        assert_eq!(entries, vec![saved]);
    }

    #[tokio::test]
    async fn delete_removes_matching_entry() {
        let store = memory_store();
        let first = store.save(&sample_result(100.0)).await.unwrap();
        let second = store.save(&sample_result(200.0)).await.unwrap();

        let remaining = store.delete(&first.id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second.id);
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn delete_of_absent_id_is_a_no_op() {
        let store = memory_store();
        store.save(&sample_result(100.0)).await.unwrap();
        store.save(&sample_result(200.0)).await.unwrap();

        let before = store.list().await;
        let after = store.delete("no-such-id").await.unwrap();
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn clear_empties_the_history() {
        let store = memory_store();
        store.save(&sample_result(100.0)).await.unwrap();

        store.clear().await.unwrap();
        assert!(store.list().await.is_empty());
    }

    struct FailingBackend;

    #[async_trait]
    impl KeyValueBackend for FailingBackend {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Engine("disk on fire".to_string()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Engine("disk on fire".to_string()))
        }

        async fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Engine("disk on fire".to_string()))
        }
    }

    #[tokio::test]
    async fn read_failure_degrades_to_empty() {
        let store = HistoryStore::new(Arc::new(FailingBackend));
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn write_failure_propagates() {
        let store = HistoryStore::new(Arc::new(FailingBackend));
        let err = store.save(&sample_result(100.0)).await.unwrap_err();
        assert!(matches!(err, StoreError::Engine(_)));
    }

    #[tokio::test]
    async fn corrupt_payload_degrades_to_empty() {
        let backend = Arc::new(MemoryCollection::new());
        backend.set("calculations", "not json at all").await.unwrap();

        let store = HistoryStore::new(backend);
        assert!(store.list().await.is_empty());
    }
}
