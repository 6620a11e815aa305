//! Shared test utilities for store integration tests
#![allow(dead_code)]

use cubby_store::{FileStore, UploadPipeline};
use tempfile::TempDir;

/// Set up a test environment with a store and pipeline over a fresh root.
pub async fn setup_test_env() -> (FileStore, UploadPipeline, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::open(temp_dir.path().join("storage")).await.unwrap();
    let pipeline = UploadPipeline::new(store.clone(), None);
    (store, pipeline, temp_dir)
}
