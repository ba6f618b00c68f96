//! User profiles and the directory used to render them

use crate::error::ModelError;
use crate::ids::UserId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Display profile of a chat member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User id
    pub id: UserId,
    /// First name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Username without the leading `@`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl UserProfile {
    /// Profile with only an id
    #[inline]
    #[must_use]
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            first_name: None,
            last_name: None,
            username: None,
            phone: None,
        }
    }

    /// With first and last name
    #[inline]
    #[must_use]
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    /// With username
    #[inline]
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// With phone
    #[inline]
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// `First Last @username phone`, skipping unknown parts.
/// Falls back to the numeric id when nothing else is known.
impl std::fmt::Display for UserProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = [
            self.first_name.clone(),
            self.last_name.clone(),
            self.username.as_ref().map(|u| format!("@{u}")),
            self.phone.clone(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect();

        if parts.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

/// Lookup of profiles by user id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    profiles: HashMap<UserId, UserProfile>,
}

impl UserDirectory {
    /// Create empty directory
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a profile
    pub fn insert(&mut self, profile: UserProfile) {
        self.profiles.insert(profile.id, profile);
    }

    /// Profile for a user, if known
    #[inline]
    #[must_use]
    pub fn get(&self, id: UserId) -> Option<&UserProfile> {
        self.profiles.get(&id)
    }

    /// Profile for a user
    ///
    /// # Errors
    /// `ModelError::UnknownUser` if the user has no profile
    #[inline]
    pub fn profile(&self, id: UserId) -> Result<&UserProfile, ModelError> {
        self.get(id).ok_or(ModelError::UnknownUser(id))
    }

    /// Number of known users
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether no user is known
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Extend<UserProfile> for UserDirectory {
    fn extend<T: IntoIterator<Item = UserProfile>>(&mut self, iter: T) {
        for profile in iter {
            self.insert(profile);
        }
    }
}

impl FromIterator<UserProfile> for UserDirectory {
    fn from_iter<T: IntoIterator<Item = UserProfile>>(iter: T) -> Self {
        let mut directory = Self::new();
        directory.extend(iter);
        directory
    }
}
