use super::{Post, PostId, PostStatus, PostType, UserId, Viewer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One admissible status in a listing, optionally limited to a single author
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StatusClause {
    /// Status the post must have
    pub status: PostStatus,
    /// When set, the post must also be authored by this user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserId>,
}

impl StatusClause {
    /// Clause admitting every post with `status`
    pub fn any(status: PostStatus) -> Self {
        Self {
            status,
            owner: None,
        }
    }

    /// Clause admitting posts with `status` written by `owner`
    pub fn owned_by(status: PostStatus, owner: UserId) -> Self {
        Self {
            status,
            owner: Some(owner),
        }
    }

    /// Whether a post with this status and author satisfies the clause
    pub fn matches(&self, status: PostStatus, author: UserId) -> bool {
        self.status == status && self.owner.is_none_or(|owner| owner == author)
    }
}

/// Structured predicate over post statuses used to build listing queries
///
/// A post is accepted when any clause matches it. Filters are only ever widened
/// by the moderation gate, never narrowed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusFilter {
    clauses: BTreeSet<StatusClause>,
}

impl StatusFilter {
    /// A filter that accepts nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept every post with any of the given statuses
    pub fn only(statuses: impl IntoIterator<Item = PostStatus>) -> Self {
        Self {
            clauses: statuses.into_iter().map(StatusClause::any).collect(),
        }
    }

    /// Published and closed posts, what a logged-out visitor sees
    pub fn public() -> Self {
        Self::only([PostStatus::Published, PostStatus::Closed])
    }

    /// Public posts plus the viewer's own private and hidden posts
    pub fn public_for(viewer: &Viewer) -> Self {
        let filter = Self::public();
        if viewer.id.is_anonymous() {
            return filter;
        }
        filter
            .with_owned(PostStatus::Private, viewer.id)
            .with_owned(PostStatus::Hidden, viewer.id)
    }

    /// Add an unrestricted clause for `status`
    pub fn with(mut self, status: PostStatus) -> Self {
        self.insert(StatusClause::any(status));
        self
    }

    /// Add a clause for `status` limited to posts by `owner`
    pub fn with_owned(mut self, status: PostStatus, owner: UserId) -> Self {
        self.insert(StatusClause::owned_by(status, owner));
        self
    }

    /// Add a clause; returns false if it was already present
    pub fn insert(&mut self, clause: StatusClause) -> bool {
        self.clauses.insert(clause)
    }

    /// Whether every post with `status` is accepted regardless of author
    pub fn includes(&self, status: PostStatus) -> bool {
        self.clauses.contains(&StatusClause::any(status))
    }

    /// Iterate over the clauses in a stable order
    pub fn clauses(&self) -> impl Iterator<Item = &StatusClause> {
        self.clauses.iter()
    }

    /// Whether a post with this status and author is accepted
    pub fn accepts_status(&self, status: PostStatus, author: UserId) -> bool {
        self.clauses.iter().any(|c| c.matches(status, author))
    }

    /// Whether `post` is accepted
    pub fn accepts(&self, post: &Post) -> bool {
        self.accepts_status(post.status, post.author)
    }

    /// Whether the filter accepts nothing
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl FromIterator<StatusClause> for StatusFilter {
    fn from_iter<I: IntoIterator<Item = StatusClause>>(iter: I) -> Self {
        Self {
            clauses: iter.into_iter().collect(),
        }
    }
}

/// A request for a list of topics or replies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[builder(start_fn = new)]
pub struct ListingQuery {
    /// Restrict to children of this post (a forum for topics, a topic for replies)
    pub parent: Option<PostId>,
    /// Post types to include
    #[builder(default = PostType::ALL.to_vec())]
    pub types: Vec<PostType>,
    /// Statuses to include
    #[builder(default = StatusFilter::public())]
    pub statuses: StatusFilter,
}

impl ListingQuery {
    /// Whether `post` belongs in the result set
    pub fn matches(&self, post: &Post) -> bool {
        self.parent.is_none_or(|parent| post.parent == Some(parent))
            && self.types.contains(&post.post_type)
            && self.statuses.accepts(post)
    }
}
