use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("io error: {0}")]
    Io(String),
}

/// Object storage keyed by the canonical paths built in
/// [`crate::domain::value_objects::StoragePath`]. The path is the sole
/// join key between a document row and its backing bytes.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    async fn put(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError>;

    async fn delete(&self, path: &str) -> Result<bool, StorageError>;

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}
