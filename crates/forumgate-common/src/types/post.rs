use super::{PostId, UserId};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// Kind of forum post
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    /// The originating post of a forum thread
    Topic,
    /// A post belonging to a topic
    Reply,
}

impl PostType {
    /// Both types the moderation gate is concerned with
    pub const ALL: [PostType; 2] = [PostType::Topic, PostType::Reply];

    /// Storage name of this type
    pub fn as_str(self) -> &'static str {
        match self {
            PostType::Topic => "topic",
            PostType::Reply => "reply",
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visibility status of a post
///
/// The moderation gate only ever writes [`PostStatus::Published`] and
/// [`PostStatus::Pending`]; the remaining statuses are set by other parts of the
/// host (spam filtering, thread closing, private and hidden forums).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Publicly visible
    #[serde(rename = "publish")]
    Published,
    /// Awaiting moderator approval
    Pending,
    /// Flagged as spam
    Spam,
    /// Visible, but closed to new replies
    Closed,
    /// Visible to its author and moderators only
    Private,
    /// Hidden from listings
    Hidden,
}

impl PostStatus {
    /// Storage name of this status
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Published => "publish",
            PostStatus::Pending => "pending",
            PostStatus::Spam => "spam",
            PostStatus::Closed => "closed",
            PostStatus::Private => "private",
            PostStatus::Hidden => "hidden",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submission that has not been persisted yet
///
/// # Example
///
/// ```
/// use forumgate_common::types::{NewPost, PostId, PostStatus, PostType, UserId};
///
/// let reply = NewPost::new()
///     .post_type(PostType::Reply)
///     .author(UserId(7))
///     .parent(PostId(12))
///     .title("Re: build fails on arm64")
///     .content("Try clearing the target directory first.")
///     .build();
///
/// assert_eq!(reply.status, PostStatus::Published);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[builder(start_fn = new)]
pub struct NewPost {
    /// Submitting user, [`UserId::ANONYMOUS`] when logged out
    #[builder(default)]
    pub author: UserId,
    /// Topic or reply
    pub post_type: PostType,
    /// Status requested so far; upstream spam filtering may already have set
    /// [`PostStatus::Spam`]
    #[builder(default = PostStatus::Published)]
    pub status: PostStatus,
    /// Owning topic (for replies) or forum (for topics)
    pub parent: Option<PostId>,
    /// Post title
    #[builder(into, default)]
    pub title: SmolStr,
    /// Post body
    #[builder(into, default)]
    pub content: String,
}

/// A persisted post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier assigned by the store
    pub id: PostId,
    /// Submitting user
    pub author: UserId,
    /// Topic or reply
    pub post_type: PostType,
    /// Current status
    pub status: PostStatus,
    /// Owning topic (for replies) or forum (for topics)
    pub parent: Option<PostId>,
    /// Post title
    pub title: SmolStr,
    /// Post body
    pub content: String,
}

impl Post {
    /// Assign an id to a submission
    pub fn from_new(id: PostId, new: NewPost) -> Self {
        Self {
            id,
            author: new.author,
            post_type: new.post_type,
            status: new.status,
            parent: new.parent,
            title: new.title,
            content: new.content,
        }
    }

    /// Whether the post is awaiting moderation
    pub fn is_pending(&self) -> bool {
        self.status == PostStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_storage_names() {
        let json = serde_json::to_string(&PostStatus::Published).unwrap();
        assert_eq!(json, "\"publish\"");
        let status: PostStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(status, PostStatus::Pending);
    }

    #[test]
    fn new_post_defaults() {
        let topic = NewPost::new().post_type(PostType::Topic).build();
        assert!(topic.author.is_anonymous());
        assert_eq!(topic.status, PostStatus::Published);
        assert_eq!(topic.parent, None);
        assert!(topic.title.is_empty());
    }

    #[test]
    fn from_new_carries_fields() {
        let new = NewPost::new()
            .post_type(PostType::Reply)
            .author(UserId(3))
            .status(PostStatus::Pending)
            .parent(PostId(9))
            .title("hello")
            .content("body")
            .build();
        let post = Post::from_new(PostId(10), new);
        assert_eq!(post.id, PostId(10));
        assert_eq!(post.parent, Some(PostId(9)));
        assert!(post.is_pending());
        assert_eq!(post.title, "hello");
    }
}
