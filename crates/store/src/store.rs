//! Tenant-scoped blob storage over a local filesystem root.
//!
//! One [`FileStore`] owns a single storage root; every identity maps to an
//! exclusive directory underneath it (see [`crate::namespace`]). All file
//! access funnels through [`FileStore::resolve`], which canonicalizes the
//! requested path and verifies it stays strictly inside the owning
//! namespace. There is no separate metadata index - the directory listing is
//! the source of truth for what blobs exist, which is fine for a single
//! node but will not scale past it.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use tokio::fs;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::identity::Identity;
use crate::namespace::{dirname_for, Namespace};

/// Name prefix for in-flight write temp files. They live in the namespace
/// directory so the final rename never crosses a filesystem boundary, and
/// [`FileStore::list`] never reports them.
const TMP_PREFIX: &str = ".tmp-";

/// Filesystem-backed blob store, fixed to one storage root.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if absent.
    ///
    /// The root is canonicalized once here; every later containment check
    /// compares against canonical paths only.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root).await?;
        let root = fs::canonicalize(root).await?;
        Ok(Self { root })
    }

    /// The canonical storage root containing all namespaces.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the namespace for an authenticated identity, materializing
    /// its directory on first access.
    ///
    /// Pure mapping: the same identity always yields the same namespace.
    /// Concurrent first access is safe - "already exists" is success.
    pub async fn namespace_for(&self, identity: &Identity) -> Result<Namespace> {
        let dirname = dirname_for(identity.as_str());
        let path = self.root.join(&dirname);
        fs::create_dir_all(&path).await?;
        Ok(Namespace::new(dirname, path))
    }

    /// Canonicalize `namespace/requested` and verify the result is strictly
    /// inside the namespace directory.
    ///
    /// This is the single chokepoint for the containment invariant: every
    /// path touched by [`read`](Self::read), [`write`](Self::write) and
    /// [`delete`](Self::delete) comes out of here. The check runs after full
    /// canonicalization (`.`, `..` and symlinks resolved), never on the raw
    /// string. A target that does not exist yet is accepted only if its
    /// canonical parent is the namespace itself and the name is a single
    /// normal path component.
    pub async fn resolve(&self, namespace: &Namespace, requested: &str) -> Result<PathBuf> {
        let candidate = namespace.path().join(requested);
        match fs::canonicalize(&candidate).await {
            Ok(canonical) => {
                if canonical.starts_with(namespace.path()) && canonical != namespace.path() {
                    Ok(canonical)
                } else {
                    Err(deny(namespace, requested))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if !is_single_normal_component(requested) {
                    return Err(deny(namespace, requested));
                }
                let parent = match candidate.parent() {
                    Some(parent) => parent,
                    None => return Err(deny(namespace, requested)),
                };
                match fs::canonicalize(parent).await {
                    Ok(canonical_parent) if canonical_parent == namespace.path() => Ok(candidate),
                    Ok(_) => Err(deny(namespace, requested)),
                    Err(e) if e.kind() == ErrorKind::NotFound => Err(deny(namespace, requested)),
                    Err(e) => Err(StoreError::Unavailable(e)),
                }
            }
            Err(e) => Err(StoreError::Unavailable(e)),
        }
    }

    /// List the stored names in a namespace, in filesystem order.
    ///
    /// Only regular files are reported; in-flight temp files are skipped.
    /// No snapshot isolation: a listing concurrent with a write or delete
    /// may or may not reflect it.
    pub async fn list(&self, namespace: &Namespace) -> Result<Vec<String>> {
        let mut entries = fs::read_dir(namespace.path()).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => continue,
            };
            if name.starts_with(TMP_PREFIX) {
                continue;
            }
            if entry.file_type().await?.is_file() {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Read a blob's full contents.
    ///
    /// `NotFound` if the name does not resolve to an existing regular file;
    /// directories are not readable as blobs.
    pub async fn read(&self, namespace: &Namespace, name: &str) -> Result<Bytes> {
        let path = self.resolve(namespace, name).await?;
        let meta = match fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        if !meta.is_file() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        match fs::read(&path).await {
            Ok(bytes) => Ok(Bytes::from(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a blob atomically: full content to a temp file in the same
    /// namespace directory, then rename onto the stored name.
    ///
    /// Readers either see the complete new content or whatever was there
    /// before - never a partial file. A concurrent write to the same stored
    /// name settles by last rename wins.
    pub async fn write(&self, namespace: &Namespace, stored_name: &str, content: Bytes) -> Result<()> {
        let target = self.resolve(namespace, stored_name).await?;
        let tmp = namespace
            .path()
            .join(format!("{}{}", TMP_PREFIX, Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp, &content).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp, &target).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    /// Remove a blob. `NotFound` if absent; never touches directories.
    pub async fn delete(&self, namespace: &Namespace, name: &str) -> Result<()> {
        let path = self.resolve(namespace, name).await?;
        let meta = match fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        if !meta.is_file() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

/// True when `name` is exactly one normal path component - no separators,
/// no `.`/`..`, no root or prefix.
fn is_single_normal_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn deny(namespace: &Namespace, requested: &str) -> StoreError {
    tracing::warn!(
        namespace = %namespace.name(),
        name = %requested,
        "rejected request escaping its namespace"
    );
    StoreError::Traversal(requested.to_string())
}
