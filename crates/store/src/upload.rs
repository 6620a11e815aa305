//! Upload pipeline: inbound bytes plus a client-asserted filename become a
//! stored blob in the caller's namespace.

use bytes::Bytes;
use time::OffsetDateTime;

use crate::error::StoreError;
use crate::identity::Identity;
use crate::namespace::sanitize_component;
use crate::store::FileStore;

/// Errors from committing an upload.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The payload exceeds the configured size ceiling. Rejected before any
    /// bytes reach the store.
    #[error("payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: u64, limit: u64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Commits uploads into a [`FileStore`].
///
/// The pipeline derives the target namespace from the caller's verified
/// identity on every commit; there is no way to hand it a namespace it did
/// not derive itself.
#[derive(Debug, Clone)]
pub struct UploadPipeline {
    store: FileStore,
    max_bytes: Option<u64>,
}

impl UploadPipeline {
    pub fn new(store: FileStore, max_bytes: Option<u64>) -> Self {
        Self { store, max_bytes }
    }

    /// Store an upload and return the generated stored name.
    pub async fn commit(
        &self,
        identity: &Identity,
        original_name: &str,
        content: Bytes,
    ) -> Result<String, UploadError> {
        if let Some(limit) = self.max_bytes {
            let size = content.len() as u64;
            if size > limit {
                return Err(UploadError::PayloadTooLarge { size, limit });
            }
        }

        let namespace = self.store.namespace_for(identity).await?;
        let stored_name = stored_name_for(original_name);
        self.store.write(&namespace, &stored_name, content).await?;

        tracing::debug!(
            namespace = %namespace.name(),
            name = %stored_name,
            "stored upload"
        );
        Ok(stored_name)
    }
}

/// Generate a stored name: millisecond timestamp disambiguator plus the
/// sanitized client filename. Client filenames are as untrusted as
/// identities and go through the same character-class rule. Practical
/// uniqueness per namespace; an accidental collision falls back to the
/// store's overwrite-by-rename behavior rather than corrupting data.
fn stored_name_for(original_name: &str) -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    format!("{}-{}", millis, sanitize_component(original_name))
}
