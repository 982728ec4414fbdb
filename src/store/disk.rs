use crate::store::{KeyValueBackend, StoreError};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionHandle, PersistMode};
use std::sync::Arc;
use tracing::debug;

/// Disk-backed collection over a fjall partition. Values are stored as
/// UTF-8 text; writes are flushed before returning so a reported save is a
/// durable save.
pub struct DiskCollection {
    keyspace: Arc<Keyspace>,
    partition: PartitionHandle,
}

impl DiskCollection {
    pub fn new(keyspace: Arc<Keyspace>, partition: PartitionHandle) -> Self {
        Self {
            keyspace,
            partition,
        }
    }
}

#[async_trait]
impl KeyValueBackend for DiskCollection {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.partition.get(key)? {
            Some(bytes) => {
                debug!("Store HIT for key: {key}");
                let text = std::str::from_utf8(&bytes)
                    .map_err(|e| StoreError::Engine(format!("stored value is not UTF-8: {e}")))?;
                Ok(Some(text.to_string()))
            }
            None => {
                debug!("Store MISS for key: {key}");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.partition.insert(key, value)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Store PUT for key: {key}");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.partition.remove(key)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Store REMOVE for key: {key}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KeyValueStore;
    use tempfile::tempdir;

    fn open_collection(path: &std::path::Path) -> DiskCollection {
        KeyValueStore::open(path)
            .expect("keyspace should open")
            .collection("test")
            .expect("partition should open")
    }

    #[tokio::test]
    async fn test_get_set_round_trip() {
        let dir = tempdir().unwrap();
        let collection = open_collection(dir.path());

        assert!(collection.get("key1").await.unwrap().is_none());

        collection.set("key1", "value1").await.unwrap();
        assert_eq!(
            collection.get("key1").await.unwrap(),
            Some("value1".to_string())
        );

        assert!(collection.get("key2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites_existing_value() {
        let dir = tempdir().unwrap();
        let collection = open_collection(dir.path());

        collection.set("key1", "first").await.unwrap();
        collection.set("key1", "second").await.unwrap();
        assert_eq!(
            collection.get("key1").await.unwrap(),
            Some("second".to_string())
        );
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = tempdir().unwrap();
        let collection = open_collection(dir.path());

        collection.set("key1", "value1").await.unwrap();
        collection.remove("key1").await.unwrap();
        assert!(collection.get("key1").await.unwrap().is_none());

        // Removing an absent key is not an error.
        collection.remove("key1").await.unwrap();
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let collection = open_collection(dir.path());
            collection.set("key1", "persisted").await.unwrap();
        }

        let collection = open_collection(dir.path());
        assert_eq!(
            collection.get("key1").await.unwrap(),
            Some("persisted".to_string())
        );
    }
}
