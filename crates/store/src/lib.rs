//! Tenant-isolated blob storage.
//!
//! This crate maps authenticated identities to exclusive directories under a
//! single storage root and confines every file operation to the caller's
//! directory. The pieces:
//!
//! - [`Identity`] - the opaque authenticated caller, passed explicitly into
//!   every operation
//! - [`Namespace`] - one identity's storage subtree, derived by
//!   [`FileStore::namespace_for`]
//! - [`FileStore`] - list/read/write/delete scoped to a namespace, with a
//!   single canonicalize-and-verify chokepoint ([`FileStore::resolve`])
//! - [`UploadPipeline`] - turns inbound bytes plus an untrusted filename
//!   into a stored blob
//!
//! # Example
//!
//! ```rust,no_run
//! use cubby_store::{FileStore, Identity, UploadPipeline};
//!
//! # async fn example() -> Result<(), cubby_store::UploadError> {
//! let store = FileStore::open("/var/lib/cubby").await?;
//! let pipeline = UploadPipeline::new(store.clone(), Some(16 * 1024 * 1024));
//!
//! let caller = Identity::new("a@b.com");
//! let stored = pipeline
//!     .commit(&caller, "report.pdf", bytes::Bytes::from_static(b"%PDF"))
//!     .await?;
//!
//! let namespace = store.namespace_for(&caller).await?;
//! let names = store.list(&namespace).await?;
//! assert!(names.contains(&stored));
//! # Ok(())
//! # }
//! ```

mod error;
mod identity;
mod namespace;
mod store;
mod upload;

pub use error::{Result, StoreError};
pub use identity::Identity;
pub use namespace::{sanitize_component, Namespace};
pub use store::FileStore;
pub use upload::{UploadError, UploadPipeline};
