use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded: {required} bytes needed, limit is {limit}")]
    QuotaExceeded { required: u64, limit: u64 },

    #[error("storage is corrupt: {0}")]
    Corrupt(String),

    #[error("storage I/O error: {0}")]
    Io(String),
}

/// String key/value store, the persistence boundary of the application.
#[async_trait]
pub trait KeyValueStorePort: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
