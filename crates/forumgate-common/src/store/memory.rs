//! In-memory post storage implementation

use crate::error::{Result, StoreError};
use crate::store::PostStore;
use crate::types::{ListingQuery, NewPost, Post, PostId, PostStatus, PostType, UserId};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// In-memory post storage using BTreeMap
///
/// Useful for:
/// - Testing
/// - Embedding the gate in hosts that keep a forum in memory
///
/// Clones share the same underlying map. Ids are assigned sequentially,
/// starting after the highest id already present or reserved.
#[derive(Debug, Clone, Default)]
pub struct MemoryPostStore {
    posts: Arc<RwLock<BTreeMap<PostId, Post>>>,
    reserved: Arc<RwLock<u64>>,
}

impl MemoryPostStore {
    /// Create new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create new memory store holding `posts`
    pub fn new_from_posts(posts: impl IntoIterator<Item = Post>) -> Self {
        Self {
            posts: Arc::new(RwLock::new(
                posts.into_iter().map(|post| (post.id, post)).collect(),
            )),
            reserved: Arc::default(),
        }
    }

    /// Get number of posts stored
    pub fn len(&self) -> usize {
        self.posts.read().map(|posts| posts.len()).unwrap_or(0)
    }

    /// Check if store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reserve `id` so the next created post gets a larger one.
    ///
    /// Used for ids that live outside this store, such as forums.
    pub fn reserve(&self, id: PostId) -> Result<()> {
        let posts = self.posts.read().map_err(|_| poisoned())?;
        if posts.contains_key(&id) {
            return Err(StoreError::Invalid(format!("post {id} already exists")));
        }
        drop(posts);
        let mut reserved = self.reserved.write().map_err(|_| poisoned())?;
        *reserved = (*reserved).max(id.get());
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<PostId, Post>>> {
        self.posts.read().map_err(|_| poisoned())
    }
}

fn poisoned() -> StoreError {
    StoreError::Invalid("post store lock poisoned".into())
}

impl PostStore for MemoryPostStore {
    fn create(&self, post: NewPost) -> Result<Post> {
        let mut posts = self.posts.write().map_err(|_| poisoned())?;
        let reserved = *self.reserved.read().map_err(|_| poisoned())?;
        let last = posts.keys().next_back().map(|id| id.get()).unwrap_or(0);
        let id = PostId(last.max(reserved) + 1);
        let post = Post::from_new(id, post);
        posts.insert(id, post.clone());
        Ok(post)
    }

    fn get(&self, id: PostId) -> Result<Option<Post>> {
        Ok(self.read()?.get(&id).cloned())
    }

    fn set_status(&self, id: PostId, status: PostStatus) -> Result<Post> {
        let mut posts = self.posts.write().map_err(|_| poisoned())?;
        let post = posts.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        post.status = status;
        Ok(post.clone())
    }

    fn count_by_author_and_status(
        &self,
        author: UserId,
        types: &[PostType],
        status: PostStatus,
    ) -> Result<u64> {
        Ok(self
            .read()?
            .values()
            .filter(|p| p.author == author && p.status == status && types.contains(&p.post_type))
            .count() as u64)
    }

    fn count_by_type_and_status(&self, post_type: PostType, status: PostStatus) -> Result<u64> {
        Ok(self
            .read()?
            .values()
            .filter(|p| p.post_type == post_type && p.status == status)
            .count() as u64)
    }

    fn ancestors(&self, id: PostId) -> Result<Vec<PostId>> {
        let posts = self.read()?;
        let mut chain = Vec::new();
        let mut current = posts.get(&id).ok_or(StoreError::NotFound(id))?.parent;
        while let Some(parent) = current {
            // Guard against cycles in hand-built data.
            if parent == id || chain.contains(&parent) {
                break;
            }
            chain.push(parent);
            current = posts.get(&parent).and_then(|p| p.parent);
        }
        Ok(chain)
    }

    fn query(&self, query: &ListingQuery) -> Result<Vec<Post>> {
        Ok(self
            .read()?
            .values()
            .filter(|post| query.matches(post))
            .cloned()
            .collect())
    }
}
