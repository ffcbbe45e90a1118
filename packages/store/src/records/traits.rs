use async_trait::async_trait;

use super::error::RecordError;
use super::model::{InventoryRecord, NewRecord, RecordPatch};
use crate::storage::StorageRef;

/// The durable collection of inventory records.
///
/// Every mutating call is one atomic read-modify-write of the whole
/// collection; implementations serialize mutations against each other.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Validate and insert a record, assigning the next id.
    async fn create(&self, record: NewRecord) -> Result<InventoryRecord, RecordError>;

    /// All records in persisted order.
    async fn list(&self) -> Result<Vec<InventoryRecord>, RecordError>;

    async fn get(&self, id: u64) -> Result<InventoryRecord, RecordError>;

    /// Overwrite the non-empty fields of `patch`; empty or omitted fields keep
    /// their stored value.
    async fn update(&self, id: u64, patch: RecordPatch) -> Result<InventoryRecord, RecordError>;

    /// Replace the record's photo reference. The previous blob is left alone.
    async fn set_photo(&self, id: u64, photo: StorageRef)
    -> Result<InventoryRecord, RecordError>;

    /// Remove the record permanently. Its photo blob is left alone.
    async fn delete(&self, id: u64) -> Result<(), RecordError>;
}
