//! Error types for the roster model
//!
//! Covers:
//! - Chat tree construction (duplicate ids, nameless chats)
//! - Snapshot and directory lookups
//! - Configuration document loading

use crate::ids::{ChatId, UserId};
use std::path::PathBuf;

/// Errors raised by the in-memory model
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// The same chat id appears twice in the hierarchy
    #[error("duplicate chat id {0} in hierarchy")]
    DuplicateChatId(ChatId),

    /// A chat was declared without any alias
    #[error("chat {0} has no aliases")]
    EmptyAliases(ChatId),

    /// Snapshot has no roster entry for a chat
    #[error("no roster for chat {0} in membership snapshot")]
    MissingRoster(ChatId),

    /// User directory has no profile for a user
    #[error("user {0} not found in directory")]
    UnknownUser(UserId),
}

/// Errors loading a configuration document
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the document
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid JSON for the config schema
    #[error("invalid JSON config: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Document is not valid YAML for the config schema
    #[error("invalid YAML config: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// Document parsed but describes an invalid hierarchy
    #[error("invalid chat hierarchy: {0}")]
    Model(#[from] ModelError),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
