//! Error types for preview validation.

use thiserror::Error;

/// Reasons a preview request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    /// No token was supplied, or it was empty.
    #[error("Missing preview key.")]
    MissingToken,

    /// The supplied token does not match the site's token.
    #[error("Invalid preview key.")]
    InvalidToken,
}

/// Result type for preview operations.
pub type PreviewResult<T> = Result<T, PreviewError>;
