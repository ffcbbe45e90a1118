use serde::{Deserialize, Serialize};

use super::error::RecordError;
use crate::storage::StorageRef;

/// One inventory item as persisted in the collection file.
///
/// Serialized as `{"id", "inventory_name", "description", "photo"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: u64,
    #[serde(rename = "inventory_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "photo", default, deserialize_with = "blank_as_none")]
    pub photo_ref: Option<StorageRef>,
}

/// A hand-edited `"photo": ""` means no photo.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<StorageRef>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let photo = Option::<StorageRef>::deserialize(deserializer)?;
    Ok(photo.filter(|r| !r.as_str().trim().is_empty()))
}

/// Input to [`RecordStore::create`](super::RecordStore::create).
#[derive(Debug, Clone, Default)]
pub struct NewRecord {
    pub name: String,
    pub description: Option<String>,
    pub photo_ref: Option<StorageRef>,
}

/// Partial update of a record's text fields.
///
/// `None` and `Some("")` both mean "keep the stored value".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl RecordPatch {
    pub(crate) fn apply(self, record: &mut InventoryRecord) {
        if let Some(name) = self.name.filter(|n| !n.is_empty()) {
            record.name = name;
        }
        if let Some(description) = self.description.filter(|d| !d.is_empty()) {
            record.description = description;
        }
    }
}

/// Reject a missing or blank item name.
pub fn validate_name(name: &str) -> Result<(), RecordError> {
    if name.trim().is_empty() {
        return Err(RecordError::Validation {
            field: "inventory_name",
            message: "must not be empty",
        });
    }
    Ok(())
}
