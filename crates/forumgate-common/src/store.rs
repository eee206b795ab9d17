//! Post storage abstraction

use crate::error::Result;
use crate::types::{ListingQuery, NewPost, Post, PostId, PostStatus, PostType, UserId};

mod memory;

pub use memory::MemoryPostStore;

/// Storage for topics and replies
///
/// The moderation gate never keeps posts itself; it reads and writes through
/// this trait. Implementations might use:
/// - In-memory map ([`MemoryPostStore`])
/// - The host's relational posts table (user-provided)
///
/// Calls are synchronous and request scoped.
pub trait PostStore {
    /// Persist a submission and return the stored post with its new id
    fn create(&self, post: NewPost) -> Result<Post>;

    /// Fetch a post by id
    ///
    /// Returns `None` if the post is not found.
    fn get(&self, id: PostId) -> Result<Option<Post>>;

    /// Change the status of an existing post and return the updated post
    ///
    /// Fails with [`StoreError::NotFound`](crate::error::StoreError::NotFound)
    /// if there is no such post.
    fn set_status(&self, id: PostId, status: PostStatus) -> Result<Post>;

    /// Count posts by `author` whose type is one of `types` and whose status
    /// is `status`
    fn count_by_author_and_status(
        &self,
        author: UserId,
        types: &[PostType],
        status: PostStatus,
    ) -> Result<u64>;

    /// Count every post of `post_type` with `status`
    fn count_by_type_and_status(&self, post_type: PostType, status: PostStatus) -> Result<u64>;

    /// Ordered ancestry of a post, nearest first
    ///
    /// For a reply this is `[topic, forum]`. The chain ends at the first id the
    /// store does not hold as a post (forums are usually kept elsewhere).
    fn ancestors(&self, id: PostId) -> Result<Vec<PostId>>;

    /// Run a listing query
    fn query(&self, query: &ListingQuery) -> Result<Vec<Post>>;
}

impl<T: PostStore + ?Sized> PostStore for &T {
    fn create(&self, post: NewPost) -> Result<Post> {
        (**self).create(post)
    }
    fn get(&self, id: PostId) -> Result<Option<Post>> {
        (**self).get(id)
    }
    fn set_status(&self, id: PostId, status: PostStatus) -> Result<Post> {
        (**self).set_status(id, status)
    }
    fn count_by_author_and_status(
        &self,
        author: UserId,
        types: &[PostType],
        status: PostStatus,
    ) -> Result<u64> {
        (**self).count_by_author_and_status(author, types, status)
    }
    fn count_by_type_and_status(&self, post_type: PostType, status: PostStatus) -> Result<u64> {
        (**self).count_by_type_and_status(post_type, status)
    }
    fn ancestors(&self, id: PostId) -> Result<Vec<PostId>> {
        (**self).ancestors(id)
    }
    fn query(&self, query: &ListingQuery) -> Result<Vec<Post>> {
        (**self).query(query)
    }
}
