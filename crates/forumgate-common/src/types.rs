use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Listing filters over post statuses
pub mod filter;
/// Posts, submissions and their classification
pub mod post;
/// Acting users and what they are allowed to do
pub mod viewer;

pub use filter::{ListingQuery, StatusClause, StatusFilter};
pub use post::{NewPost, Post, PostStatus, PostType};
pub use viewer::{AuthorProfile, Capability, Viewer};

/// Opaque identifier of a post (forum, topic or reply)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl PostId {
    /// Raw numeric value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PostId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for PostId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Identifier of a user account
///
/// [`UserId::ANONYMOUS`] stands in for submissions made without an account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl UserId {
    /// Sentinel author of anonymous submissions
    pub const ANONYMOUS: UserId = UserId(0);

    /// Whether this is the anonymous sentinel
    pub fn is_anonymous(self) -> bool {
        self == Self::ANONYMOUS
    }

    /// Raw numeric value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_anonymous() {
            f.write_str("anonymous")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
