//! Dispatcher-facing entry points
//!
//! [`ModerationGate`] bundles the collaborators a host provides and exposes
//! one method per point in the host's pipeline where moderation applies.
//! Each method loads a fresh settings snapshot, so changes made on the
//! settings page take effect on the next request.

use crate::error::{GateError, Result};
use crate::moderation::{
    self, Cascade, Notifier, NotifyOutcome, PendingContext, SiteInfo, SubscriberNotifier,
};
use forumgate_common::settings::{install_defaults, uninstall};
use forumgate_common::{
    ListingQuery, ModerationSettings, NewPost, Post, PostId, PostStatus, PostStore, PostType,
    SettingsStore, StatusFilter, StoreError, UserDirectory, Viewer,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use url::Url;

/// Number of posts waiting for a moderator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PendingCounts {
    /// Pending topics
    pub topics: u64,
    /// Pending replies
    pub replies: u64,
}

impl PendingCounts {
    /// Pending topics and replies together
    pub fn total(&self) -> u64 {
        self.topics + self.replies
    }
}

/// Moderation gate wired to a host's stores and notifiers
///
/// # Example
///
/// ```
/// use forumgate::ModerationGate;
/// use forumgate::moderation::{MemoryNotifier, MemorySubscriberNotifier, SiteInfo};
/// use forumgate_common::settings::MemorySettingsStore;
/// use forumgate_common::store::MemoryPostStore;
/// use forumgate_common::users::MemoryUserDirectory;
/// use forumgate_common::{NewPost, PostStatus, PostType, Viewer};
///
/// # fn main() -> forumgate::Result<()> {
/// let gate = ModerationGate::new()
///     .posts(MemoryPostStore::new())
///     .settings(MemorySettingsStore::new())
///     .users(MemoryUserDirectory::new())
///     .notifier(MemoryNotifier::new())
///     .subscribers(MemorySubscriberNotifier::new())
///     .site(
///         SiteInfo::new()
///             .name("Rust Forum")
///             .home(url::Url::parse("https://forum.example.org/").unwrap())
///             .admin_email("admin@example.org")
///             .build(),
///     )
///     .build();
/// gate.activate()?;
///
/// let topic = NewPost::new()
///     .post_type(PostType::Topic)
///     .title("First!")
///     .build();
/// let stored = gate.submit(topic, &Viewer::anonymous())?;
/// assert_eq!(stored.status, PostStatus::Pending);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, bon::Builder)]
#[builder(start_fn = new)]
pub struct ModerationGate<P, S, U, N, B> {
    posts: P,
    settings: S,
    users: U,
    notifier: N,
    subscribers: B,
    site: SiteInfo,
}

impl<P, S, U, N, B> ModerationGate<P, S, U, N, B>
where
    P: PostStore,
    S: SettingsStore,
    U: UserDirectory,
    N: Notifier,
    B: SubscriberNotifier,
{
    /// Site the gate serves
    pub fn site(&self) -> &SiteInfo {
        &self.site
    }

    /// The post store
    pub fn posts(&self) -> &P {
        &self.posts
    }

    /// Settings snapshot for the current request
    ///
    /// If the settings store cannot be read, every flag is treated as set, the
    /// most cautious configuration.
    pub fn settings(&self) -> ModerationSettings {
        match ModerationSettings::load(&self.settings) {
            Ok(settings) => settings,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    error = %_e,
                    "could not read moderation settings, using defaults"
                );
                ModerationSettings::default()
            }
        }
    }

    /// Create any missing settings with their defaults
    pub fn activate(&self) -> forumgate_common::Result<()> {
        install_defaults(&self.settings)
    }

    /// Remove every setting owned by the gate
    pub fn uninstall(&self) -> forumgate_common::Result<()> {
        uninstall(&self.settings)
    }

    /// Decide a submission's status before it is stored
    pub fn pre_insert(&self, mut candidate: NewPost, viewer: &Viewer) -> NewPost {
        let settings = self.settings();
        let prior = moderation::prior_published_count(&self.posts, candidate.author);
        moderation::evaluate(&candidate, viewer, &settings, prior).apply(&mut candidate);
        candidate
    }

    /// Report a freshly stored post if it was held
    pub fn after_insert(&self, post: &Post) -> NotifyOutcome {
        let settings = self.settings();
        let author = if post.author.is_anonymous() {
            None
        } else {
            self.users.profile(post.author).unwrap_or_else(|_e| {
                #[cfg(feature = "tracing")]
                tracing::warn!(author = %post.author, error = %_e, "could not look up author");
                None
            })
        };
        moderation::on_pending_created(
            post,
            &settings,
            PendingContext {
                site: &self.site,
                author: author.as_ref(),
            },
            &self.notifier,
        )
    }

    /// Evaluate, store and report a submission, in that order
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            level = "debug",
            skip_all,
            fields(post_type = %candidate.post_type, author = %candidate.author)
        )
    )]
    pub fn submit(&self, candidate: NewPost, viewer: &Viewer) -> Result<Post> {
        let candidate = self.pre_insert(candidate, viewer);
        let post = self.posts.create(candidate)?;
        if post.is_pending() {
            #[cfg(feature = "tracing")]
            tracing::info!(post = %post.id, "submission held for moderation");
            self.after_insert(&post);
        }
        Ok(post)
    }

    /// Widen a listing filter according to the current settings
    pub fn listing_filter(&self, base: StatusFilter) -> StatusFilter {
        moderation::augment_listing_filter(base, &self.settings())
    }

    /// Run a listing query after widening its status filter
    pub fn list(&self, query: ListingQuery) -> Result<Vec<Post>> {
        let query = moderation::augment_listing_query(query, &self.settings());
        Ok(self.posts.query(&query)?)
    }

    /// Publish a pending post on behalf of a moderator
    ///
    /// Approving a reply notifies the subscribers of its topic and forum,
    /// which were skipped while the reply was pending.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self)))]
    pub fn approve(&self, id: PostId) -> Result<Option<Cascade>> {
        let post = self
            .posts
            .get(id)?
            .ok_or(GateError::Store(StoreError::NotFound(id)))?;
        if !post.is_pending() {
            return Err(GateError::NotPending { id });
        }
        let post = self.posts.set_status(id, PostStatus::Published)?;
        if post.post_type != PostType::Reply {
            return Ok(None);
        }
        let ancestry = self.posts.ancestors(id).unwrap_or_else(|_e| {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_e, "could not load ancestry");
            Vec::new()
        });
        Ok(moderation::on_approved(&post, &ancestry, &self.subscribers))
    }

    /// Mark a post as spam on behalf of a moderator
    pub fn mark_spam(&self, id: PostId) -> Result<Post> {
        Ok(self.posts.set_status(id, PostStatus::Spam)?)
    }

    /// Whether replies may be posted under `topic`
    ///
    /// `allowed` is the host's own answer; the gate only ever narrows it. Replies
    /// stay closed until the topic is published, so nobody answers a topic that
    /// may yet be rejected.
    pub fn can_reply(&self, topic: PostId, allowed: bool) -> bool {
        if !allowed {
            return false;
        }
        match self.posts.get(topic) {
            Ok(Some(post)) => post.status == PostStatus::Published,
            _ => false,
        }
    }

    /// Where to send the author after creating a topic
    ///
    /// A pending topic cannot be viewed yet, so when `redirect` points at one
    /// (via its `p` query argument) the author is sent back to `referer`, or to
    /// the site home when there is none.
    pub fn redirect_after_topic(&self, redirect: Url, referer: Option<Url>) -> Url {
        let Some(id) = moderation::post_id_from_url(&redirect) else {
            return redirect;
        };
        match self.posts.get(id) {
            Ok(Some(post)) if post.post_type == PostType::Topic && post.is_pending() => {
                referer.unwrap_or_else(|| self.site.home.clone())
            }
            _ => redirect,
        }
    }

    /// Pending topics and replies, for an administrator badge
    pub fn pending_counts(&self) -> Result<PendingCounts> {
        Ok(PendingCounts {
            topics: self
                .posts
                .count_by_type_and_status(PostType::Topic, PostStatus::Pending)?,
            replies: self
                .posts
                .count_by_type_and_status(PostType::Reply, PostStatus::Pending)?,
        })
    }

    /// Link to render for post `id`
    pub fn display_permalink(&self, id: PostId, viewer: &Viewer) -> String {
        let link = self.site.permalink(id);
        match self.posts.get(id) {
            Ok(Some(post)) => moderation::permalink(&post, link.as_str(), viewer).into_owned(),
            _ => link.into(),
        }
    }

    /// Title to render for post `id`
    pub fn display_title<'a>(&self, id: PostId, title: &'a str) -> Cow<'a, str> {
        match self.posts.get(id) {
            Ok(Some(post)) => moderation::title(&post, title),
            _ => Cow::Borrowed(title),
        }
    }

    /// Content to render for post `id`
    pub fn display_content<'a>(
        &self,
        id: PostId,
        content: &'a str,
        viewer: &Viewer,
    ) -> Cow<'a, str> {
        match self.posts.get(id) {
            Ok(Some(post)) => moderation::content(&post, content, viewer),
            _ => Cow::Borrowed(content),
        }
    }
}
