mod error;
mod reference;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use reference::StorageRef;
pub use traits::{BlobStore, BoxReader};
