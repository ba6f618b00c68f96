//! Error types for the validation daemon
//!
//! Provides error handling for:
//! - Roster fetching (missing chats, timeouts, source failures)
//! - Report delivery
//! - The validation run as a whole

use roster_audit::AuditError;
use roster_model::{ChatId, ConfigError};
use std::path::PathBuf;

/// Roster fetch errors
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// Source does not know the chat
    #[error("chat {0} not found by roster source")]
    ChatNotFound(ChatId),

    /// Fetch did not complete in time
    #[error("fetching roster of chat {chat} timed out after {timeout_ms}ms")]
    Timeout { chat: ChatId, timeout_ms: u64 },

    /// Source-specific failure
    #[error("roster source failed for chat {chat}: {message}")]
    Source { chat: ChatId, message: String },

    /// IO error reading a roster file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Roster file is not valid JSON
    #[error("invalid roster file: {0}")]
    InvalidFile(#[from] serde_json::Error),
}

impl RosterError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if a later attempt could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Source { .. })
    }
}

/// Report delivery errors
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Destination rejected or dropped the report
    #[error("delivery to chat {target} failed: {message}")]
    DeliveryFailed { target: ChatId, message: String },

    /// Output stream error
    #[error("io error delivering report: {0}")]
    Io(#[from] std::io::Error),
}

/// Validation run errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Configuration could not be loaded
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Snapshot could not be built
    #[error("roster fetch failed: {0}")]
    Roster(#[from] RosterError),

    /// Audit precondition failed
    #[error("audit failed: {0}")]
    Audit(#[from] AuditError),

    /// Report could not be delivered
    #[error("notification failed: {0}")]
    Notify(#[from] NotifyError),
}

impl ValidationError {
    /// Check if rerunning the validation could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Roster(err) => err.is_retryable(),
            Self::Notify(_) => true,
            Self::Config(_) | Self::Audit(_) => false,
        }
    }
}
