use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufReader};
use tracing::debug;

use super::error::StorageError;
use super::reference::StorageRef;
use super::traits::{BlobStore, BoxReader};

/// Filesystem-backed photo store.
///
/// Blobs live directly under `root` as `{millis}.{ext}`. Names are issued
/// from a millisecond clock that never repeats within the process, and files
/// are opened with `create_new` so a name left by a previous run is skipped
/// instead of overwritten.
pub struct FilesystemBlobStore {
    root: PathBuf,
    last_token: AtomicU64,
}

impl FilesystemBlobStore {
    /// Create a store rooted at `root`. The directory is created on the first
    /// `put`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            last_token: AtomicU64::new(0),
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Next unique token: the current time in milliseconds, bumped past the
    /// last issued token when two uploads land in the same millisecond.
    fn next_token(&self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let previous = self
            .last_token
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn put(&self, data: &[u8], original_name: &str) -> Result<StorageRef, StorageError> {
        fs::create_dir_all(&self.root).await?;

        loop {
            let storage_ref = StorageRef::generate(self.next_token(), original_name);
            let path = self.resolve(&storage_ref);

            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };

            let written = async {
                file.write_all(data).await?;
                file.flush().await
            }
            .await;

            if let Err(e) = written {
                drop(file);
                let _ = fs::remove_file(&path).await;
                return Err(e.into());
            }

            debug!(%storage_ref, size = data.len(), "Stored photo");
            return Ok(storage_ref);
        }
    }

    fn resolve(&self, storage_ref: &StorageRef) -> PathBuf {
        self.root.join(storage_ref.as_str())
    }

    async fn open(&self, storage_ref: &StorageRef) -> Result<BoxReader, StorageError> {
        storage_ref.validate()?;
        let path = self.resolve(storage_ref);
        match fs::File::open(&path).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(storage_ref.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
