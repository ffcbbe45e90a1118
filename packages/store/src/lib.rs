//! Durable storage for inventory items: the JSON-file record collection and
//! the directory of uploaded photos the records point at.

pub mod records;
pub mod storage;

pub use records::{InventoryRecord, NewRecord, RecordError, RecordPatch, RecordStore};
pub use storage::{BlobStore, StorageError, StorageRef};
