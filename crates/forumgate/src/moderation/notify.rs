use super::{Notification, NotifyOutcome, SiteInfo};
use forumgate_common::{AuthorProfile, ModerationSettings, Post};
use std::error::Error as StdError;
use std::fmt::Write as _;
use std::sync::{Arc, RwLock};

/// Errors a [`Notifier`] may report
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum NotifyError {
    /// The message could not be delivered
    #[error("delivery failed: {0}")]
    #[diagnostic(code(forumgate::notify::delivery))]
    Delivery(String),

    /// Any other error from a notifier implementation
    #[error(transparent)]
    #[diagnostic(code(forumgate::notify::other))]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

/// Outbound channel to the site administrator (usually email)
///
/// Sending is fire-and-forget from the gate's point of view: errors are
/// logged and otherwise ignored.
pub trait Notifier {
    /// Deliver a notification
    fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        (**self).send(notification)
    }
}

/// Notifier that keeps every message in memory
///
/// Can be told to fail, to exercise delivery-failure handling. Clones share
/// the same outbox.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    outbox: Arc<RwLock<Vec<Notification>>>,
    failure: Arc<RwLock<Option<String>>>,
}

impl MemoryNotifier {
    /// Create a notifier with an empty outbox
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `send` fail with `reason`
    pub fn fail_with(&self, reason: impl Into<String>) {
        if let Ok(mut failure) = self.failure.write() {
            *failure = Some(reason.into());
        }
    }

    /// Deliver normally again
    pub fn recover(&self) {
        if let Ok(mut failure) = self.failure.write() {
            *failure = None;
        }
    }

    /// Everything delivered so far
    pub fn sent(&self) -> Vec<Notification> {
        self.outbox
            .read()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }
}

impl Notifier for MemoryNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        if let Some(reason) = self.failure.read().ok().and_then(|f| f.clone()) {
            return Err(NotifyError::Delivery(reason));
        }
        self.outbox
            .write()
            .map_err(|_| NotifyError::Delivery("outbox lock poisoned".into()))?
            .push(notification.clone());
        Ok(())
    }
}

/// What [`on_pending_created`] needs to know beyond the post itself
#[derive(Debug, Clone, Copy)]
pub struct PendingContext<'a> {
    /// Site the post was made on
    pub site: &'a SiteInfo,
    /// Profile of the post's author, `None` for anonymous or unknown authors
    pub author: Option<&'a AuthorProfile>,
}

/// Build the administrator notification for a held post
pub fn compose_pending_notification(
    site: &SiteInfo,
    post: &Post,
    author: Option<&AuthorProfile>,
) -> Notification {
    let mut body = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        body,
        "New topic/reply awaiting moderation on your site {}: {}\r\n\r\n",
        site.name, site.home
    );
    let _ = write!(body, "{}\r\n\r\n", site.permalink(post.id));
    body.push_str("The following content was posted\r\n");

    match author.filter(|_| !post.author.is_anonymous()) {
        Some(profile) => {
            let _ = write!(body, "by {}", profile.login);
            if let Some(name) = profile.full_name() {
                let _ = write!(body, " ({name})");
            }
            body.push_str("\r\n\r\n");
        }
        None => body.push_str("by Anonymous\r\n\r\n"),
    }

    let _ = write!(body, "{}\r\n{}\r\n\r\n", post.title, post.content);

    Notification {
        to: site.admin_email.clone(),
        subject: format!("[{}] Forum moderation - {}", site.name, post.title),
        body,
    }
}

/// Report a newly stored pending post to the administrator
///
/// Call once, after the post has been stored, so the message reflects what
/// was persisted. Does nothing unless the post is pending and
/// `notify_on_pending` is set. Delivery failures are logged and reported in
/// the returned outcome, never propagated.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip_all, fields(post = %post.id))
)]
pub fn on_pending_created(
    post: &Post,
    settings: &ModerationSettings,
    ctx: PendingContext<'_>,
    notifier: &impl Notifier,
) -> NotifyOutcome {
    if !post.is_pending() {
        return NotifyOutcome::NotPending;
    }
    if !settings.notify_on_pending {
        return NotifyOutcome::Disabled;
    }

    let notification = compose_pending_notification(ctx.site, post, ctx.author);
    match notifier.send(&notification) {
        Ok(()) => {
            #[cfg(feature = "tracing")]
            tracing::info!(to = %notification.to, "moderation notification sent");
            NotifyOutcome::Sent
        }
        Err(e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %e, "moderation notification failed");
            NotifyOutcome::Failed(e.to_string())
        }
    }
}
