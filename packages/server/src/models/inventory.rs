use serde::{Deserialize, Serialize};
use store::{InventoryRecord, RecordPatch, StorageRef};

/// Path segment under which stored photos are served.
pub const UPLOADS_SEGMENT: &str = "uploads";

/// Request body for updating an item's text fields.
///
/// Omitted and empty fields both leave the stored value unchanged.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateItemRequest {
    #[schema(example = "Impact Drill")]
    pub inventory_name: Option<String>,
    #[schema(example = "18V, two batteries")]
    pub description: Option<String>,
}

impl From<UpdateItemRequest> for RecordPatch {
    fn from(req: UpdateItemRequest) -> Self {
        Self {
            name: req.inventory_name,
            description: req.description,
        }
    }
}

/// Form fields posted by the search page.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SearchRequest {
    /// Item ID to look up.
    #[schema(example = "2")]
    pub id: String,
    /// Checkbox value; any of `on`, `true`, `1`, `yes` includes the photo link.
    #[serde(default)]
    #[schema(example = "on")]
    pub has_photo: Option<String>,
}

impl SearchRequest {
    pub fn parse_id(&self) -> Option<u64> {
        self.id.trim().parse().ok().filter(|id| *id > 0)
    }

    pub fn wants_photo(&self) -> bool {
        self.has_photo.as_deref().is_some_and(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "on" | "true" | "1" | "yes"
            )
        })
    }
}

/// Client-facing view of an inventory item.
#[derive(Debug, Serialize, PartialEq, utoipa::ToSchema)]
pub struct InventoryItemResponse {
    #[schema(example = 2)]
    pub id: u64,
    #[schema(example = "Hammer")]
    pub inventory_name: String,
    #[schema(example = "steel")]
    pub description: String,
    /// Absolute URL of the item's photo, `null` when it has none. Omitted
    /// entirely from search results that did not ask for it.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(
        value_type = Option<String>,
        example = "http://localhost:3000/uploads/1718044800123.png"
    )]
    pub photo_url: Option<Option<String>>,
}

impl InventoryItemResponse {
    /// Full view: `photo_url` is always present, `null` when there is no photo.
    pub fn from_record(record: InventoryRecord, base_url: &str) -> Self {
        Self::from_record_with_photo(record, base_url, true)
    }

    /// Search view: when `include_photo` is false the `photo_url` field is
    /// dropped from the output rather than set to `null`.
    pub fn from_record_with_photo(
        record: InventoryRecord,
        base_url: &str,
        include_photo: bool,
    ) -> Self {
        let photo_url = include_photo.then(|| {
            record
                .photo_ref
                .as_ref()
                .map(|photo| photo_locator(base_url, photo))
        });

        Self {
            id: record.id,
            inventory_name: record.name,
            description: record.description,
            photo_url,
        }
    }
}

/// `{base_url}/uploads/{photo}`.
pub fn photo_locator(base_url: &str, photo: &StorageRef) -> String {
    format!(
        "{}/{UPLOADS_SEGMENT}/{photo}",
        base_url.trim_end_matches('/')
    )
}
