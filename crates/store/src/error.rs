//! Error types for the tenant file store.

/// Errors that can occur when working with the file store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested name does not resolve to an existing regular file
    /// within the namespace.
    #[error("blob not found: {0}")]
    NotFound(String),

    /// The requested name resolves outside its namespace (`..`, absolute
    /// paths, or symlink escapes). Callers serving untrusted clients must
    /// answer this exactly like [`StoreError::NotFound`].
    #[error("path escapes namespace: {0}")]
    Traversal(String),

    /// The underlying storage medium failed (permissions, disk full, I/O).
    /// Fatal to the individual operation, never retried.
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] std::io::Error),
}

/// Result type alias for file store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
