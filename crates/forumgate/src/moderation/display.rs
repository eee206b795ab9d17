//! Display transforms for pending posts.
//!
//! Pure functions; nothing here is persisted.

use forumgate_common::{Post, Viewer};
use std::borrow::Cow;

/// Marker appended to titles and substituted for content of pending posts
pub const AWAITING_MODERATION: &str = "(Awaiting moderation)";

/// Inert link shown instead of the permalink of a pending post
pub const PLACEHOLDER_PERMALINK: &str = "#";

/// Separator between the marker and the real content shown to moderators
pub const CONTENT_SEPARATOR: &str = "<br />";

/// Permalink to render for `post`
///
/// Viewers who cannot moderate get [`PLACEHOLDER_PERMALINK`] for pending posts.
pub fn permalink<'a>(post: &Post, link: &'a str, viewer: &Viewer) -> Cow<'a, str> {
    if post.is_pending() && !viewer.can_moderate() {
        Cow::Borrowed(PLACEHOLDER_PERMALINK)
    } else {
        Cow::Borrowed(link)
    }
}

/// Title to render for `post`
pub fn title<'a>(post: &Post, title: &'a str) -> Cow<'a, str> {
    if post.is_pending() {
        Cow::Owned(format!("{title} {AWAITING_MODERATION}"))
    } else {
        Cow::Borrowed(title)
    }
}

/// Content to render for `post`
///
/// Moderators see the marker followed by the real content; everyone else sees
/// only the marker.
pub fn content<'a>(post: &Post, content: &'a str, viewer: &Viewer) -> Cow<'a, str> {
    if !post.is_pending() {
        Cow::Borrowed(content)
    } else if viewer.can_moderate() {
        Cow::Owned(format!("{AWAITING_MODERATION}{CONTENT_SEPARATOR}{content}"))
    } else {
        Cow::Borrowed(AWAITING_MODERATION)
    }
}
