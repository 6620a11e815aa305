//! Identity-to-namespace mapping.
//!
//! Every authenticated identity owns exactly one directory under the storage
//! root. The directory name is derived from the identity by a pure function:
//! a sanitized rendering of the identity (for operator debuggability) plus a
//! SHA-256 prefix of the raw identity, so two identities whose sanitized
//! forms collide still map to distinct namespaces.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Characters kept verbatim in sanitized path components.
/// Everything else maps to a single `_`.
fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-'
}

/// Maximum length of the sanitized portion of a namespace directory name.
/// Hostile identities can be arbitrarily long; the hash suffix carries the
/// uniqueness, so the readable prefix can be clamped freely.
const MAX_SANITIZED_LEN: usize = 64;

/// Number of hex characters of SHA-256(identity) embedded in the directory
/// name (8 bytes of digest).
const HASH_PREFIX_LEN: usize = 16;

/// Sanitize an untrusted string into a single safe path component.
///
/// Total function: every character outside `[A-Za-z0-9._-]` becomes `_`,
/// then any literal `..` collapses to `__` so the result can never
/// reintroduce a parent-directory token once joined with separators.
/// Empty input maps to a lone `_` rather than an empty component.
pub fn sanitize_component(raw: &str) -> String {
    let mapped: String = raw
        .chars()
        .map(|c| if is_safe_char(c) { c } else { '_' })
        .collect();
    let collapsed = mapped.replace("..", "__");
    if collapsed.is_empty() {
        "_".to_string()
    } else {
        collapsed
    }
}

/// Derive the namespace directory name for an identity.
pub(crate) fn dirname_for(identity: &str) -> String {
    let mut sanitized = sanitize_component(identity);
    sanitized.truncate(MAX_SANITIZED_LEN);

    let digest = Sha256::digest(identity.as_bytes());
    let mut tag = hex::encode(digest);
    tag.truncate(HASH_PREFIX_LEN);

    format!("{}-{}", sanitized, tag)
}

/// Handle to one identity's exclusive storage subtree.
///
/// Only [`FileStore::namespace_for`](crate::FileStore::namespace_for) hands
/// these out, after the backing directory exists. Holding a `Namespace` means
/// the directory name has been derived from a verified identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    dirname: String,
    path: PathBuf,
}

impl Namespace {
    pub(crate) fn new(dirname: String, path: PathBuf) -> Self {
        Self { dirname, path }
    }

    /// The directory name under the storage root.
    pub fn name(&self) -> &str {
        &self.dirname
    }

    /// Absolute path of the namespace directory.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
