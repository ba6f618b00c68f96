//! Error types for the audit core

use roster_model::{ChatId, MembershipSnapshot, UserId};
use std::collections::BTreeSet;

/// Audit failures
///
/// All variants are precondition failures: the run must abort rather than
/// produce an under-reported or partially rendered result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuditError {
    /// Snapshot has no roster for a chat of the tree
    #[error("incomplete snapshot: no roster for chat {0}")]
    MissingRoster(ChatId),

    /// Violation references a user without a profile
    #[error("user {0} is not in the user directory")]
    UnknownUser(UserId),

    /// Violation references a chat outside the hierarchy
    #[error("chat {0} is not in the chat hierarchy")]
    UnknownChat(ChatId),
}

/// Result type alias for audit operations
pub type AuditResult<T> = Result<T, AuditError>;

/// Members of `chat`, failing loudly when the snapshot has no entry
pub(crate) fn roster(
    snapshot: &MembershipSnapshot,
    chat: ChatId,
) -> AuditResult<&BTreeSet<UserId>> {
    snapshot
        .members(chat)
        .map_err(|_| AuditError::MissingRoster(chat))
}
