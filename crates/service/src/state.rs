use cubby_store::{FileStore, UploadPipeline};

use crate::config::Config;

/// Main service state - the store plus the upload pipeline bound to it
#[derive(Clone)]
pub struct State {
    store: FileStore,
    uploads: UploadPipeline,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        tracing::info!(root = %config.storage_root.display(), "opening file store");
        let store = FileStore::open(&config.storage_root).await?;
        let uploads = UploadPipeline::new(store.clone(), config.max_upload_bytes);
        Ok(Self { store, uploads })
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    pub fn uploads(&self) -> &UploadPipeline {
        &self.uploads
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("storage root unavailable: {0}")]
    Storage(#[from] cubby_store::StoreError),
}
