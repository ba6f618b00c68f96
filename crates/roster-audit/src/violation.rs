//! Membership violation records

use roster_model::{ChatId, UserId};
use serde::{Deserialize, Serialize};

/// A single membership inconsistency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// User is in a descendant chat but not in one of its ancestors
    AncestorMissing {
        user_id: UserId,
        present_in_chat_id: ChatId,
        missing_in_chat_id: ChatId,
    },

    /// User is in a flagged chat but in none of the chats below it
    ChildCoverageMissing {
        user_id: UserId,
        present_in_chat_id: ChatId,
    },
}

impl Violation {
    /// User found in `present_in` (descendant) but absent from `missing_in` (ancestor)
    #[inline]
    #[must_use]
    pub fn ancestor_missing(user_id: UserId, present_in: ChatId, missing_in: ChatId) -> Self {
        Self::AncestorMissing {
            user_id,
            present_in_chat_id: present_in,
            missing_in_chat_id: missing_in,
        }
    }

    /// User found in `present_in` but absent from all of its descendants
    #[inline]
    #[must_use]
    pub fn child_coverage_missing(user_id: UserId, present_in: ChatId) -> Self {
        Self::ChildCoverageMissing {
            user_id,
            present_in_chat_id: present_in,
        }
    }

    /// Affected user
    #[inline]
    #[must_use]
    pub fn user_id(&self) -> UserId {
        match self {
            Self::AncestorMissing { user_id, .. } | Self::ChildCoverageMissing { user_id, .. } => {
                *user_id
            }
        }
    }

    /// Chat where the user was found
    #[inline]
    #[must_use]
    pub fn present_in(&self) -> ChatId {
        match self {
            Self::AncestorMissing {
                present_in_chat_id, ..
            }
            | Self::ChildCoverageMissing {
                present_in_chat_id, ..
            } => *present_in_chat_id,
        }
    }

    /// Where the user should also have been
    #[inline]
    #[must_use]
    pub fn context(&self) -> MissingContext {
        match self {
            Self::AncestorMissing {
                missing_in_chat_id, ..
            } => MissingContext::SpecificChat(*missing_in_chat_id),
            Self::ChildCoverageMissing { .. } => MissingContext::AnyChildChat,
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AncestorMissing {
                user_id,
                present_in_chat_id,
                missing_in_chat_id,
            } => write!(
                f,
                "user {user_id} is in chat {present_in_chat_id} but missing in ancestor chat {missing_in_chat_id}"
            ),
            Self::ChildCoverageMissing {
                user_id,
                present_in_chat_id,
            } => write!(
                f,
                "user {user_id} is in chat {present_in_chat_id} but in none of its child chats"
            ),
        }
    }
}

/// Report grouping key: a specific missing chat, or the child chats of the
/// chat the user was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MissingContext {
    /// A specific ancestor chat
    SpecificChat(ChatId),
    /// Any chat below the chat the user was found in
    AnyChildChat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_cover_both_variants() {
        let ancestor = Violation::ancestor_missing(UserId::new(1), ChatId::new(20), ChatId::new(10));
        assert_eq!(ancestor.user_id(), UserId::new(1));
        assert_eq!(ancestor.present_in(), ChatId::new(20));
        assert_eq!(ancestor.context(), MissingContext::SpecificChat(ChatId::new(10)));

        let child = Violation::child_coverage_missing(UserId::new(2), ChatId::new(10));
        assert_eq!(child.user_id(), UserId::new(2));
        assert_eq!(child.present_in(), ChatId::new(10));
        assert_eq!(child.context(), MissingContext::AnyChildChat);
    }

    #[test]
    fn serializes_with_kind_tag() {
        let child = Violation::child_coverage_missing(UserId::new(11111), ChatId::new(1234));
        let json = serde_json::to_value(child).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "kind": "child_coverage_missing",
                "user_id": 11111,
                "present_in_chat_id": 1234
            })
        );
    }

    #[test]
    fn display_names_both_chats() {
        let v = Violation::ancestor_missing(UserId::new(7), ChatId::new(2), ChatId::new(1));
        assert_eq!(
            v.to_string(),
            "user 7 is in chat 2 but missing in ancestor chat 1"
        );
    }
}
