use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::error::RecordError;
use super::model::{InventoryRecord, NewRecord, RecordPatch, validate_name};
use super::traits::RecordStore;
use crate::storage::StorageRef;

/// Record store persisted as a single JSON array file.
///
/// The file is the only state: every operation reads it in full, and every
/// mutation rewrites it in full through a temp file and rename. One
/// `RwLock` guards the cycle; mutations hold it exclusively, reads share it.
///
/// The lock also carries the highest id this store has seen, so an id freed
/// by deleting the newest record is never handed out again.
pub struct JsonFileRecordStore {
    path: PathBuf,
    high_water: RwLock<u64>,
}

impl JsonFileRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            high_water: RwLock::new(0),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read the whole collection. A missing or blank file is empty.
    async fn load(&self) -> Result<Vec<InventoryRecord>, RecordError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| RecordError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the whole collection on disk.
    async fn persist(&self, records: &[InventoryRecord]) -> Result<(), RecordError> {
        let bytes = serde_json::to_vec_pretty(records).map_err(std::io::Error::from)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.temp_path();
        let written = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&bytes).await?;
            file.sync_all().await?;
            fs::rename(&temp_path, &self.path).await
        }
        .await;

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(())
    }

    /// Sibling of the collection file, so the rename stays on one filesystem.
    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "records".to_string());
        self.path
            .with_file_name(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()))
    }

    /// Run `mutate` against the loaded collection under the write lock and
    /// persist the result.
    ///
    /// `mutate` also receives the high-water id, already raised to cover
    /// every id in the loaded collection.
    async fn modify<T>(
        &self,
        mutate: impl FnOnce(&mut Vec<InventoryRecord>, &mut u64) -> Result<T, RecordError>
            + Send,
    ) -> Result<T, RecordError> {
        let mut high_water = self.high_water.write().await;
        let mut records = self.load().await?;
        *high_water = (*high_water).max(max_id(&records));
        let out = mutate(&mut records, &mut *high_water)?;
        self.persist(&records).await?;
        Ok(out)
    }
}

/// Largest id in the collection, or 0 when empty. Rescanned on every
/// mutation so ids stay correct after the file is edited by hand.
fn max_id(records: &[InventoryRecord]) -> u64 {
    records.iter().map(|r| r.id).max().unwrap_or(0)
}

fn find_mut(records: &mut [InventoryRecord], id: u64) -> Result<&mut InventoryRecord, RecordError> {
    records
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or(RecordError::NotFound(id))
}

#[async_trait]
impl RecordStore for JsonFileRecordStore {
    async fn create(&self, record: NewRecord) -> Result<InventoryRecord, RecordError> {
        validate_name(&record.name)?;

        let created = self
            .modify(|records, high_water| {
                *high_water += 1;
                let created = InventoryRecord {
                    id: *high_water,
                    name: record.name,
                    description: record.description.unwrap_or_default(),
                    photo_ref: record.photo_ref,
                };
                records.push(created.clone());
                Ok(created)
            })
            .await?;

        info!(id = created.id, name = %created.name, "Inventory item created");
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<InventoryRecord>, RecordError> {
        let _guard = self.high_water.read().await;
        self.load().await
    }

    async fn get(&self, id: u64) -> Result<InventoryRecord, RecordError> {
        let _guard = self.high_water.read().await;
        self.load()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or(RecordError::NotFound(id))
    }

    async fn update(&self, id: u64, patch: RecordPatch) -> Result<InventoryRecord, RecordError> {
        let updated = self
            .modify(|records, _| {
                let record = find_mut(records, id)?;
                patch.apply(record);
                Ok(record.clone())
            })
            .await?;

        debug!(id, "Inventory item updated");
        Ok(updated)
    }

    async fn set_photo(
        &self,
        id: u64,
        photo: StorageRef,
    ) -> Result<InventoryRecord, RecordError> {
        let updated = self
            .modify(|records, _| {
                let record = find_mut(records, id)?;
                record.photo_ref = Some(photo);
                Ok(record.clone())
            })
            .await?;

        debug!(id, photo = ?updated.photo_ref, "Inventory item photo replaced");
        Ok(updated)
    }

    async fn delete(&self, id: u64) -> Result<(), RecordError> {
        self.modify(|records, _| {
            let index = records
                .iter()
                .position(|r| r.id == id)
                .ok_or(RecordError::NotFound(id))?;
            records.remove(index);
            Ok(())
        })
        .await?;

        info!(id, "Inventory item deleted");
        Ok(())
    }
}
