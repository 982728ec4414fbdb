pub mod disk;
pub mod memory;

use async_trait::async_trait;
use disk::DiskCollection;
use fjall::{Keyspace, PartitionCreateOptions};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage engine error: {0}")]
    Engine(String),
    #[error("failed to encode stored value: {0}")]
    Codec(#[from] serde_json::Error),
}

impl From<fjall::Error> for StoreError {
    fn from(err: fjall::Error) -> Self {
        StoreError::Engine(err.to_string())
    }
}

/// A named collection of string keys mapping to text values.
///
/// Persistence operations are the application's only suspension points;
/// implementations surface failures to the immediate caller and never retry
/// internally.
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// A key-value store handing out named persistent collections backed by a
/// single fjall keyspace.
pub struct KeyValueStore {
    keyspace: Arc<Keyspace>,
}

impl KeyValueStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let keyspace = fjall::Config::new(path.as_ref()).open()?;
        Ok(Self {
            keyspace: Arc::new(keyspace),
        })
    }

    pub fn collection(&self, name: &str) -> Result<DiskCollection, StoreError> {
        let partition = self
            .keyspace
            .open_partition(name, PartitionCreateOptions::default())?;
        Ok(DiskCollection::new(Arc::clone(&self.keyspace), partition))
    }
}
