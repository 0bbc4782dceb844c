//! Error types for the content source layer.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing content.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The content API transport reported a failure.
    #[error("api error: {0}")]
    Api(String),

    /// The backend cannot be constructed (missing site id, credentials...).
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// A locale, channel or key cannot be used as a mirror path segment.
    #[error("invalid mirror key: {0:?}")]
    InvalidKey(String),

    /// A blocking task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(String),
}
