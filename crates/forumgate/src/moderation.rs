//! Moderation policy for forum submissions
//!
//! This module decides whether a new topic or reply is published straight away
//! or held for a moderator, and provides the hooks a host calls around that
//! decision. Everything here is synchronous and parameterized entirely by its
//! arguments; nothing is read from process-wide state.
//!
//! # Core Concepts
//!
//! - **Decision**: the outcome of [`evaluate`], either keep the submission as
//!   it is or mark it [`Pending`](forumgate_common::PostStatus::Pending)
//! - **Settings**: a [`ModerationSettings`](forumgate_common::ModerationSettings)
//!   snapshot loaded once per request
//! - **Listing filter**: a structured [`StatusFilter`](forumgate_common::StatusFilter)
//!   widened by [`augment_listing_filter`] so pending posts can be listed
//! - **Notifications**: [`on_pending_created`] emails the administrator,
//!   [`on_approved`] cascades subscriber notifications once a reply is approved
//!
//! # Example
//!
//! ```
//! # use forumgate::moderation::*;
//! # use forumgate_common::{ModerationSettings, NewPost, PostType, Viewer};
//! let reply = NewPost::new().post_type(PostType::Reply).content("hi").build();
//! let decision = evaluate(&reply, &Viewer::anonymous(), &ModerationSettings::default(), 0);
//! assert_eq!(decision, Decision::SetPending);
//! ```

mod approval;
mod decision;
mod display;
mod listing;
mod notify;
mod types;

#[cfg(test)]
mod tests;

pub use approval::{MemorySubscriberNotifier, SubscriberNotifier, on_approved};
pub use decision::{evaluate, prior_published_count};
pub use display::{
    AWAITING_MODERATION, CONTENT_SEPARATOR, PLACEHOLDER_PERMALINK, content, permalink, title,
};
pub use listing::{augment_listing_filter, augment_listing_query};
pub use notify::{
    MemoryNotifier, Notifier, NotifyError, PendingContext, compose_pending_notification,
    on_pending_created,
};
pub use types::{Cascade, Decision, Notification, NotifyOutcome, SiteInfo, post_id_from_url};
