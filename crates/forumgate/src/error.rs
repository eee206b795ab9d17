//! Error types for gate operations that persist data

use forumgate_common::{PostId, StoreError};

/// Result type alias for [`ModerationGate`](crate::ModerationGate) operations
pub type Result<T> = std::result::Result<T, GateError>;

/// Errors returned by gate operations that must reach the store
///
/// Decisions themselves never fail: storage trouble while deciding degrades to
/// holding the post. Only operations whose whole purpose is to write or read
/// posts surface an error.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum GateError {
    /// The post store failed
    #[error("post store error: {0}")]
    Store(
        #[from]
        #[diagnostic_source]
        StoreError,
    ),

    /// An approval was requested for a post that is not a pending topic or reply
    #[error("post {id} is not pending")]
    #[diagnostic(
        code(forumgate::gate::not_pending),
        help("only pending posts can be approved")
    )]
    NotPending {
        /// The post that was not pending
        id: PostId,
    },
}
