//! Moderation settings and their storage.
//!
//! The gate reads five independent boolean flags. Hosts persist them through
//! a [`SettingsStore`]; the gate takes a [`ModerationSettings`] snapshot once per
//! request and passes it explicitly to every decision.

use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Named flags understood by the moderation gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsFlag {
    /// Include pending posts in topic and reply listings
    AlwaysDisplay,
    /// Email the administrator when a post is held
    Notify,
    /// Hold every anonymous topic
    AlwaysApproveTopics,
    /// Hold every anonymous reply
    AlwaysApproveReplies,
    /// Let registered authors with a published post skip moderation
    PreviouslyApproved,
}

impl SettingsFlag {
    /// Every flag, in storage order
    pub const ALL: [SettingsFlag; 5] = [
        SettingsFlag::AlwaysDisplay,
        SettingsFlag::Notify,
        SettingsFlag::AlwaysApproveTopics,
        SettingsFlag::AlwaysApproveReplies,
        SettingsFlag::PreviouslyApproved,
    ];

    /// Key under which the flag is persisted
    pub fn key(self) -> &'static str {
        match self {
            SettingsFlag::AlwaysDisplay => "forumgate_always_display",
            SettingsFlag::Notify => "forumgate_notify",
            SettingsFlag::AlwaysApproveTopics => "forumgate_always_approve_topics",
            SettingsFlag::AlwaysApproveReplies => "forumgate_always_approve_replies",
            SettingsFlag::PreviouslyApproved => "forumgate_previously_approved",
        }
    }

    /// Look a flag up by its persisted key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.key() == key)
    }
}

impl fmt::Display for SettingsFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Snapshot of the moderation flags for one request
///
/// The `always_approve_*` names are historical: `true` means "always hold for
/// moderation".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationSettings {
    /// Include pending posts in listings
    pub always_display_pending: bool,
    /// Email the administrator when a post is held
    pub notify_on_pending: bool,
    /// Hold anonymous topics
    pub always_approve_topics: bool,
    /// Hold anonymous replies
    pub always_approve_replies: bool,
    /// Registered authors with at least one published post skip moderation
    pub previously_approved_bypass: bool,
}

impl Default for ModerationSettings {
    fn default() -> Self {
        Self {
            always_display_pending: true,
            notify_on_pending: true,
            always_approve_topics: true,
            always_approve_replies: true,
            previously_approved_bypass: true,
        }
    }
}

impl ModerationSettings {
    /// Value of a single flag
    pub fn get(&self, flag: SettingsFlag) -> bool {
        match flag {
            SettingsFlag::AlwaysDisplay => self.always_display_pending,
            SettingsFlag::Notify => self.notify_on_pending,
            SettingsFlag::AlwaysApproveTopics => self.always_approve_topics,
            SettingsFlag::AlwaysApproveReplies => self.always_approve_replies,
            SettingsFlag::PreviouslyApproved => self.previously_approved_bypass,
        }
    }

    /// Set a single flag
    pub fn set(&mut self, flag: SettingsFlag, value: bool) {
        let slot = match flag {
            SettingsFlag::AlwaysDisplay => &mut self.always_display_pending,
            SettingsFlag::Notify => &mut self.notify_on_pending,
            SettingsFlag::AlwaysApproveTopics => &mut self.always_approve_topics,
            SettingsFlag::AlwaysApproveReplies => &mut self.always_approve_replies,
            SettingsFlag::PreviouslyApproved => &mut self.previously_approved_bypass,
        };
        *slot = value;
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, flag: SettingsFlag, value: bool) -> Self {
        self.set(flag, value);
        self
    }

    /// Read a snapshot from a store
    ///
    /// A flag that is absent from the store reads as `false`, as an unset
    /// option does in the host. Call [`install_defaults`] on activation so
    /// every flag exists.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all))]
    pub fn load(store: &impl SettingsStore) -> Result<Self> {
        let mut settings = Self::default();
        for flag in SettingsFlag::ALL {
            settings.set(flag, store.get(flag)?.unwrap_or(false));
        }
        Ok(settings)
    }

    /// Write every flag of this snapshot to a store
    pub fn save(&self, store: &impl SettingsStore) -> Result<()> {
        for flag in SettingsFlag::ALL {
            store.set(flag, self.get(flag))?;
        }
        Ok(())
    }
}

/// Pluggable storage for moderation flags.
pub trait SettingsStore {
    /// Current value of a flag, `None` if it has never been set
    fn get(&self, flag: SettingsFlag) -> Result<Option<bool>>;
    /// Persist a flag
    fn set(&self, flag: SettingsFlag, value: bool) -> Result<()>;
    /// Remove a flag entirely
    fn delete(&self, flag: SettingsFlag) -> Result<()>;
}

impl<T: SettingsStore + ?Sized> SettingsStore for &T {
    fn get(&self, flag: SettingsFlag) -> Result<Option<bool>> {
        (**self).get(flag)
    }
    fn set(&self, flag: SettingsFlag, value: bool) -> Result<()> {
        (**self).set(flag, value)
    }
    fn delete(&self, flag: SettingsFlag) -> Result<()> {
        (**self).delete(flag)
    }
}

/// Create every absent flag with its default value (`true`).
///
/// Existing values are never overwritten, so re-activating keeps an
/// administrator's choices.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
pub fn install_defaults(store: &impl SettingsStore) -> Result<()> {
    let defaults = ModerationSettings::default();
    for flag in SettingsFlag::ALL {
        if store.get(flag)?.is_none() {
            store.set(flag, defaults.get(flag))?;
        }
    }
    Ok(())
}

/// Remove every moderation flag from the store.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
pub fn uninstall(store: &impl SettingsStore) -> Result<()> {
    for flag in SettingsFlag::ALL {
        store.delete(flag)?;
    }
    Ok(())
}

/// In-memory settings store suitable for short-lived hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore(Arc<RwLock<BTreeMap<SettingsFlag, bool>>>);

impl MemorySettingsStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding every flag of `settings`
    pub fn with_settings(settings: ModerationSettings) -> Self {
        Self(Arc::new(RwLock::new(
            SettingsFlag::ALL
                .into_iter()
                .map(|flag| (flag, settings.get(flag)))
                .collect(),
        )))
    }

    /// Number of flags currently stored
    pub fn len(&self) -> usize {
        self.0.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Whether no flag is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, flag: SettingsFlag) -> Result<Option<bool>> {
        let map = self.0.read().map_err(|_| poisoned())?;
        Ok(map.get(&flag).copied())
    }

    fn set(&self, flag: SettingsFlag, value: bool) -> Result<()> {
        self.0.write().map_err(|_| poisoned())?.insert(flag, value);
        Ok(())
    }

    fn delete(&self, flag: SettingsFlag) -> Result<()> {
        self.0.write().map_err(|_| poisoned())?.remove(&flag);
        Ok(())
    }
}

fn poisoned() -> StoreError {
    StoreError::Invalid("settings lock poisoned".into())
}

/// File-backed settings store using a JSON object keyed by
/// [`SettingsFlag::key`].
///
/// Every call reads the file; writes rewrite it whole. Unknown keys are kept,
/// so the file can be shared with other options of the host.
///
/// Example
/// ```no_run
/// use forumgate_common::settings::{FileSettingsStore, ModerationSettings, install_defaults};
///
/// # fn main() -> forumgate_common::error::Result<()> {
/// let store = FileSettingsStore::new("/var/lib/forum/options.json")?;
/// install_defaults(&store)?;
/// let settings = ModerationSettings::load(&store)?;
/// assert!(settings.notify_on_pending);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct FileSettingsStore {
    /// Path to the JSON file.
    pub path: PathBuf,
}

impl FileSettingsStore {
    /// Open a store at `path`, creating an empty JSON object if the file does
    /// not exist yet.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, b"{}")?;
        }
        Ok(Self { path })
    }

    fn read(&self) -> Result<serde_json::Map<String, serde_json::Value>> {
        let file = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str(&file)? {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(StoreError::Invalid(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write(&self, map: &serde_json::Map<String, serde_json::Value>) -> Result<()> {
        std::fs::write(&self.path, serde_json::to_string_pretty(map)?)?;
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, flag: SettingsFlag) -> Result<Option<bool>> {
        let map = self.read()?;
        // Hosts commonly persist checkboxes as 1/0 or "1"/"".
        Ok(map.get(flag.key()).map(|value| match value {
            serde_json::Value::Bool(b) => *b,
            serde_json::Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            serde_json::Value::String(s) => !s.is_empty() && s != "0",
            _ => false,
        }))
    }

    fn set(&self, flag: SettingsFlag, value: bool) -> Result<()> {
        let mut map = self.read()?;
        map.insert(flag.key().to_string(), serde_json::Value::Bool(value));
        self.write(&map)
    }

    fn delete(&self, flag: SettingsFlag) -> Result<()> {
        let mut map = self.read()?;
        if map.remove(flag.key()).is_some() {
            self.write(&map)?;
        }
        Ok(())
    }
}
