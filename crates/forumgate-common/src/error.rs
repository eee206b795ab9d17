//! Error types for post and settings storage

use std::error::Error as StdError;

use crate::types::PostId;

/// Boxed error type for backend error sources
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors emitted by post stores, settings stores and user directories.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum StoreError {
    /// The requested post does not exist
    #[error("post not found: {0}")]
    #[diagnostic(
        code(forumgate::store::not_found),
        help("the post may have been deleted, or the id belongs to a different site")
    )]
    NotFound(PostId),

    /// Filesystem or I/O error
    #[error("I/O error: {0}")]
    #[diagnostic(code(forumgate::store::io))]
    Io(#[from] std::io::Error),

    /// Serialization error (e.g., JSON)
    #[error("serialization error: {0}")]
    #[diagnostic(code(forumgate::store::serde))]
    Serde(#[from] serde_json::Error),

    /// Backing store is in a state the implementation cannot read
    #[error("invalid store: {0}")]
    #[diagnostic(code(forumgate::store::invalid))]
    Invalid(String),

    /// Any other error from a backend implementation
    #[error(transparent)]
    #[diagnostic(code(forumgate::store::other))]
    Other(#[from] BoxError),
}

impl StoreError {
    /// Wrap an arbitrary backend error
    pub fn other(source: impl StdError + Send + Sync + 'static) -> Self {
        Self::Other(Box::new(source))
    }

    /// Whether this error reports a missing post
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
