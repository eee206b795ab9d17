//! Lookup of author profiles

use crate::error::{Result, StoreError};
use crate::types::{AuthorProfile, UserId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Directory of registered users, used to describe authors in notifications
pub trait UserDirectory {
    /// Profile of a registered user, `None` for unknown ids and for
    /// [`UserId::ANONYMOUS`]
    fn profile(&self, id: UserId) -> Result<Option<AuthorProfile>>;
}

impl<T: UserDirectory + ?Sized> UserDirectory for &T {
    fn profile(&self, id: UserId) -> Result<Option<AuthorProfile>> {
        (**self).profile(id)
    }
}

/// In-memory user directory
#[derive(Debug, Clone, Default)]
pub struct MemoryUserDirectory(Arc<RwLock<HashMap<UserId, AuthorProfile>>>);

impl MemoryUserDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a profile
    pub fn insert(&self, id: UserId, profile: AuthorProfile) -> Result<()> {
        if id.is_anonymous() {
            return Err(StoreError::Invalid(
                "the anonymous user cannot have a profile".into(),
            ));
        }
        self.0
            .write()
            .map_err(|_| StoreError::Invalid("user directory lock poisoned".into()))?
            .insert(id, profile);
        Ok(())
    }
}

impl UserDirectory for MemoryUserDirectory {
    fn profile(&self, id: UserId) -> Result<Option<AuthorProfile>> {
        let users = self
            .0
            .read()
            .map_err(|_| StoreError::Invalid("user directory lock poisoned".into()))?;
        Ok(users.get(&id).cloned())
    }
}
