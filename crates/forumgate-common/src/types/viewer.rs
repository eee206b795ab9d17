use super::UserId;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::collections::BTreeSet;

/// Permission held by a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Approve, spam and view pending content; own posts are never held
    Moderate,
    /// Start new topics
    PublishTopics,
    /// Reply to topics
    PublishReplies,
}

/// The user on whose behalf a request is being handled
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewer {
    /// Acting user, [`UserId::ANONYMOUS`] when logged out
    pub id: UserId,
    /// Capabilities granted to the acting user
    pub capabilities: BTreeSet<Capability>,
}

impl Viewer {
    /// A logged-out visitor with no capabilities
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A user with the given capabilities
    pub fn new(id: UserId, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            id,
            capabilities: capabilities.into_iter().collect(),
        }
    }

    /// A regular participant who may start topics and reply
    pub fn participant(id: UserId) -> Self {
        Self::new(id, [Capability::PublishTopics, Capability::PublishReplies])
    }

    /// A forum moderator
    pub fn moderator(id: UserId) -> Self {
        Self::new(
            id,
            [
                Capability::Moderate,
                Capability::PublishTopics,
                Capability::PublishReplies,
            ],
        )
    }

    /// Whether the viewer holds `capability`
    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Shorthand for `can(Capability::Moderate)`
    pub fn can_moderate(&self) -> bool {
        self.can(Capability::Moderate)
    }
}

/// Public identity of a registered author
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthorProfile {
    /// Login name
    pub login: SmolStr,
    /// Given name, possibly empty
    #[serde(default)]
    pub first_name: SmolStr,
    /// Family name, possibly empty
    #[serde(default)]
    pub last_name: SmolStr,
    /// Name chosen for public display
    #[serde(default)]
    pub display_name: SmolStr,
}

impl AuthorProfile {
    /// Profile with only a login set
    pub fn new(login: impl Into<SmolStr>) -> Self {
        Self {
            login: login.into(),
            ..Default::default()
        }
    }

    /// Set first and last name
    pub fn with_name(mut self, first: impl Into<SmolStr>, last: impl Into<SmolStr>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    /// Set the display name
    pub fn with_display_name(mut self, display_name: impl Into<SmolStr>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Human-readable name to show next to the login
    ///
    /// Prefers "first last", then the display name. Returns `None` when the
    /// result would only repeat the login (or is empty).
    pub fn full_name(&self) -> Option<String> {
        let composed = format!("{} {}", self.first_name, self.last_name);
        let mut name = composed.trim().to_string();
        if name.is_empty() {
            name = self.display_name.trim().to_string();
        }
        if name.is_empty() || name == self.login.as_str() {
            None
        } else {
            Some(name)
        }
    }
}
