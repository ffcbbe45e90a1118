use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;
use super::reference::StorageRef;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Storage for uploaded photos, addressed by generated names.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes under a freshly generated name derived from `original_name`'s
    /// extension and return that name.
    async fn put(&self, data: &[u8], original_name: &str) -> Result<StorageRef, StorageError>;

    /// Map a reference to its location. Does not check that the blob exists.
    fn resolve(&self, storage_ref: &StorageRef) -> PathBuf;

    /// Open a blob as a streaming async reader.
    async fn open(&self, storage_ref: &StorageRef) -> Result<BoxReader, StorageError>;

    /// Retrieve all bytes for a blob.
    async fn get(&self, storage_ref: &StorageRef) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.open(storage_ref).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }
}
