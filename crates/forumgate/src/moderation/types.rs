use forumgate_common::{NewPost, PostId, PostStatus};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use url::Url;

/// Outcome of evaluating a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Leave the submission's status untouched
    #[default]
    KeepAsIs,
    /// Hold the submission for a moderator
    SetPending,
}

impl Decision {
    /// Whether the submission is held
    pub fn is_pending(self) -> bool {
        self == Decision::SetPending
    }

    /// Write the decision into a submission before it is stored
    pub fn apply(self, post: &mut NewPost) {
        if self.is_pending() {
            post.status = PostStatus::Pending;
        }
    }
}

/// What happened when a held post was reported to the administrator
///
/// None of these are errors: delivery problems never reach the person who
/// submitted the post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Notifications are switched off
    Disabled,
    /// The post is not pending, nothing to report
    NotPending,
    /// The notification was handed to the notifier
    Sent,
    /// The notifier failed; the message is kept for logging
    Failed(String),
}

impl NotifyOutcome {
    /// Whether a notification was delivered
    pub fn is_sent(&self) -> bool {
        matches!(self, NotifyOutcome::Sent)
    }
}

/// Subscriber notification triggered by approving a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cascade {
    /// The approved reply
    pub reply: PostId,
    /// Topic the reply belongs to
    pub topic: PostId,
    /// Forum the topic belongs to
    pub forum: PostId,
}

/// A message for the site administrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Recipient address
    pub to: SmolStr,
    /// Subject line
    pub subject: String,
    /// Plain-text body, CRLF line endings
    pub body: String,
}

/// Facts about the site used when composing notifications and links
///
/// # Example
///
/// ```
/// use forumgate::moderation::SiteInfo;
/// use forumgate_common::PostId;
///
/// let site = SiteInfo::new()
///     .name("Rust Forum")
///     .home(url::Url::parse("https://forum.example.org/").unwrap())
///     .admin_email("admin@example.org")
///     .build();
///
/// assert_eq!(
///     site.permalink(PostId(42)).as_str(),
///     "https://forum.example.org/?p=42"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[builder(start_fn = new)]
pub struct SiteInfo {
    /// Human-readable site name
    #[builder(into)]
    pub name: SmolStr,
    /// Home page of the site
    pub home: Url,
    /// Where moderation notifications are sent
    #[builder(into)]
    pub admin_email: SmolStr,
}

impl SiteInfo {
    /// Canonical link to a post, `<home>?p=<id>`
    pub fn permalink(&self, id: PostId) -> Url {
        let mut url = self.home.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("p", &id.to_string());
        url
    }
}

/// Extract the post id from a `?p=<id>` link
pub fn post_id_from_url(url: &Url) -> Option<PostId> {
    url.query_pairs()
        .find(|(key, _)| key == "p")
        .and_then(|(_, value)| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use forumgate_common::PostType;

    #[test]
    fn apply_only_writes_pending() {
        let mut post = NewPost::new()
            .post_type(PostType::Topic)
            .status(PostStatus::Closed)
            .build();
        Decision::KeepAsIs.apply(&mut post);
        assert_eq!(post.status, PostStatus::Closed);
        Decision::SetPending.apply(&mut post);
        assert_eq!(post.status, PostStatus::Pending);
    }

    #[test]
    fn permalink_round_trips_id() {
        let site = SiteInfo::new()
            .name("Forum")
            .home(Url::parse("https://example.org/forum/?lang=en").unwrap())
            .admin_email("a@example.org")
            .build();
        let link = site.permalink(PostId(7));
        assert_eq!(link.as_str(), "https://example.org/forum/?p=7");
        assert_eq!(post_id_from_url(&link), Some(PostId(7)));
    }

    #[test]
    fn post_id_from_url_ignores_other_args() {
        let url = Url::parse("https://example.org/?topic=5&p=abc").unwrap();
        assert_eq!(post_id_from_url(&url), None);
        let url = Url::parse("https://example.org/?topic=5").unwrap();
        assert_eq!(post_id_from_url(&url), None);
    }
}
