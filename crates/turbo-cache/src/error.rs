//! Cache error types.

use thiserror::Error;

/// Errors that can occur when reading or writing a slot.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// The backend rejected the operation.
    #[error("Store operation failed: {0}")]
    StoreError(String),

    /// Filesystem failure in a file-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The value does not fit in the remaining storage quota.
    #[error("Quota exceeded writing {key}: {size} bytes, limit {limit}")]
    QuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },
}
