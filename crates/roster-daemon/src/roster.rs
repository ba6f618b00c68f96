//! Roster sources
//!
//! A [`RosterSource`] answers "who is in this chat right now". The audit core
//! never talks to a source directly; [`SnapshotBuilder`](crate::SnapshotBuilder)
//! turns a source into a complete snapshot first.

use crate::error::RosterError;
use async_trait::async_trait;
use roster_model::{ChatId, UserProfile};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Provider of current chat rosters
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Current members of a chat with their display profiles
    async fn members(&self, chat: ChatId) -> Result<Vec<UserProfile>, RosterError>;
}

/// In-memory roster source
///
/// Also backs roster files:
///
/// ```json
/// {"chats": {"1234": [{"id": 11111, "first_name": "Ada", "username": "ada"}]}}
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticRosterSource {
    rosters: HashMap<ChatId, Vec<UserProfile>>,
    delays: HashMap<ChatId, Duration>,
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    chats: HashMap<ChatId, Vec<UserProfile>>,
}

impl StaticRosterSource {
    /// Create empty source
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With the roster of a chat
    #[must_use]
    pub fn with_roster(mut self, chat: ChatId, members: Vec<UserProfile>) -> Self {
        self.rosters.insert(chat, members);
        self
    }

    /// Answer for `chat` only after `delay`
    #[must_use]
    pub fn with_delay(mut self, chat: ChatId, delay: Duration) -> Self {
        self.delays.insert(chat, delay);
        self
    }

    /// Parse a roster document
    ///
    /// # Errors
    /// `RosterError::InvalidFile` if the JSON does not match the roster schema
    pub fn from_json(json: &str) -> Result<Self, RosterError> {
        let file: RosterFile = serde_json::from_str(json)?;
        Ok(Self {
            rosters: file.chats,
            delays: HashMap::new(),
        })
    }

    /// Load a roster document from disk
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| RosterError::io_error(path, e))?;
        let source = Self::from_json(&text)?;

        tracing::info!(
            "Loaded rosters for {} chats from {}",
            source.rosters.len(),
            path.display()
        );
        Ok(source)
    }

    /// Number of chats with a roster
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rosters.len()
    }

    /// Whether no roster is known
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rosters.is_empty()
    }
}

#[async_trait]
impl RosterSource for StaticRosterSource {
    async fn members(&self, chat: ChatId) -> Result<Vec<UserProfile>, RosterError> {
        if let Some(delay) = self.delays.get(&chat) {
            tokio::time::sleep(*delay).await;
        }

        self.rosters
            .get(&chat)
            .cloned()
            .ok_or(RosterError::ChatNotFound(chat))
    }
}
