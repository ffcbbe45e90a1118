mod error;
mod model;
mod traits;

pub mod json_file;

pub use error::RecordError;
pub use model::{InventoryRecord, NewRecord, RecordPatch, validate_name};
pub use traits::RecordStore;
