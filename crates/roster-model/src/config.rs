//! Audit configuration document
//!
//! JSON (default) or YAML (`.yaml` / `.yml`) document describing the chat
//! hierarchy and where membership reports are delivered:
//!
//! ```json
//! {
//!   "chats": [
//!     {"id": 1, "aliases": ["Main"], "members_must_be_in_any_child_chat": true,
//!      "child_chats": [{"id": 2, "aliases": ["Team"]}]}
//!   ],
//!   "help_contacts": ["@admin"],
//!   "membership_validation": {"notification": {"tg_chats": [{"id": 5, "name": "Admins"}]}}
//! }
//! ```

use crate::chat::{ChatNode, ChatTree};
use crate::error::ConfigError;
use crate::ids::ChatId;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Destination chat for membership reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTarget {
    /// Destination chat id
    pub id: ChatId,
    /// Human-readable destination name
    pub name: String,
}

impl NotificationTarget {
    /// Create a target
    #[inline]
    #[must_use]
    pub fn new(id: ChatId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Where reports go
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Destination chats
    #[serde(rename = "tg_chats", default)]
    pub targets: Vec<NotificationTarget>,
}

#[derive(Debug, Default, Deserialize)]
struct MembershipValidationSection {
    #[serde(default)]
    notification: NotificationConfig,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    chats: Vec<ChatNode>,
    #[serde(default)]
    help_contacts: Vec<String>,
    #[serde(default)]
    membership_validation: MembershipValidationSection,
}

/// Loaded and validated configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    tree: ChatTree,
    help_contacts: Vec<String>,
    notification: NotificationConfig,
}

impl AuditConfig {
    /// Assemble a configuration from parts
    #[must_use]
    pub fn new(tree: ChatTree, notification: NotificationConfig) -> Self {
        Self {
            tree,
            help_contacts: Vec::new(),
            notification,
        }
    }

    /// With help contacts
    #[inline]
    #[must_use]
    pub fn with_help_contacts(mut self, contacts: Vec<String>) -> Self {
        self.help_contacts = contacts;
        self
    }

    /// Parse from JSON string
    ///
    /// # Errors
    /// Returns error if JSON is invalid or the hierarchy fails validation
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Parse from YAML string
    ///
    /// # Errors
    /// Returns error if YAML is invalid or the hierarchy fails validation
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_yaml::from_str(yaml)?;
        Self::from_raw(raw)
    }

    /// Load from a file, choosing the format by extension
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let config = if is_yaml {
            Self::from_yaml(&text)?
        } else {
            Self::from_json(&text)?
        };

        tracing::info!(
            "Loaded config from {}: {} chats, {} notification targets",
            path.display(),
            config.tree.chat_ids().len(),
            config.notification.targets.len()
        );
        Ok(config)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            tree: ChatTree::new(raw.chats)?,
            help_contacts: raw.help_contacts,
            notification: raw.membership_validation.notification,
        })
    }

    /// Chat hierarchy
    #[inline]
    #[must_use]
    pub fn tree(&self) -> &ChatTree {
        &self.tree
    }

    /// People to contact for access problems
    #[inline]
    #[must_use]
    pub fn help_contacts(&self) -> &[String] {
        &self.help_contacts
    }

    /// Notification settings
    #[inline]
    #[must_use]
    pub fn notification(&self) -> &NotificationConfig {
        &self.notification
    }
}
