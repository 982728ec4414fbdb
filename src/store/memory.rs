use crate::store::{KeyValueBackend, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory backend using HashMap and an async Mutex. Nothing outlives the
/// process; tests build history stores on top of it.
#[derive(Clone, Default)]
pub struct MemoryCollection {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueBackend for MemoryCollection {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let map = self.inner.lock().await;
        let value = map.get(key).cloned();
        if value.is_some() {
            debug!("Store HIT for key: {key}");
        } else {
            debug!("Store MISS for key: {key}");
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.inner.lock().await;
        debug!("Store PUT for key: {key}");
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut map = self.inner.lock().await;
        debug!("Store REMOVE for key: {key}");
        map.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_set_round_trip() {
        let collection = MemoryCollection::new();

        assert!(collection.get("key1").await.unwrap().is_none());

        collection.set("key1", "value1").await.unwrap();
        assert_eq!(
            collection.get("key1").await.unwrap(),
            Some("value1".to_string())
        );

        assert!(collection.get("key2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove() {
        let collection = MemoryCollection::new();

        collection.set("key1", "value1").await.unwrap();
        collection.remove("key1").await.unwrap();
        assert!(collection.get("key1").await.unwrap().is_none());
    }
}
