use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by record store operations.
#[derive(Debug, Error)]
pub enum RecordError {
    /// A required field was missing or malformed.
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },
    /// No record has the given id.
    #[error("inventory item {0} not found")]
    NotFound(u64),
    /// Reading or writing the collection file failed.
    #[error("record store IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The collection file exists but is not a JSON array of records.
    #[error("collection file {} is malformed: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
