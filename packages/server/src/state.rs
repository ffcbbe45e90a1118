use std::sync::Arc;

use store::records::json_file::JsonFileRecordStore;
use store::storage::filesystem::FilesystemBlobStore;
use store::{BlobStore, RecordStore};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn RecordStore>,
    pub blob_store: Arc<dyn BlobStore>,
    pub config: AppConfig,
}

impl AppState {
    /// Build the file-backed stores named by `config.storage`.
    pub fn from_config(config: AppConfig) -> Self {
        Self {
            records: Arc::new(JsonFileRecordStore::new(&config.storage.data_file)),
            blob_store: Arc::new(FilesystemBlobStore::new(&config.storage.uploads_dir)),
            config,
        }
    }
}
