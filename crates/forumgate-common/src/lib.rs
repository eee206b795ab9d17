//! Common types for the forumgate moderation gate
//!
//! Posts, statuses and listing filters, the moderation settings snapshot, and
//! the storage traits a host implements so the gate can read and write its
//! data.

#![warn(missing_docs)]
pub use smol_str;
pub use url;

pub mod error;
pub mod settings;
pub mod store;
/// Baseline forum data types.
pub mod types;
pub mod users;

pub use error::{Result, StoreError};
pub use settings::{ModerationSettings, SettingsFlag, SettingsStore};
pub use store::PostStore;
pub use types::{
    AuthorProfile, Capability, ListingQuery, NewPost, Post, PostId, PostStatus, PostType,
    StatusClause, StatusFilter, UserId, Viewer,
};
pub use users::UserDirectory;
