//! Membership snapshot
//!
//! Point-in-time mapping from chat to the ids of its members. A chat with no
//! entry is an error on lookup, never an empty roster: an incomplete snapshot
//! would otherwise under-report violations.

use crate::chat::ChatTree;
use crate::error::ModelError;
use crate::ids::{ChatId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Chat id to member ids, as of one validation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipSnapshot {
    rosters: HashMap<ChatId, BTreeSet<UserId>>,
}

impl MembershipSnapshot {
    /// Create empty snapshot
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the roster of a chat, replacing any previous entry
    pub fn insert(&mut self, chat: ChatId, members: impl IntoIterator<Item = UserId>) {
        self.rosters.insert(chat, members.into_iter().collect());
    }

    /// With roster (builder form of [`insert`](Self::insert))
    #[must_use]
    pub fn with_roster(mut self, chat: ChatId, members: impl IntoIterator<Item = UserId>) -> Self {
        self.insert(chat, members);
        self
    }

    /// Members of a chat
    ///
    /// # Errors
    /// `ModelError::MissingRoster` if the chat was never recorded
    #[inline]
    pub fn members(&self, chat: ChatId) -> Result<&BTreeSet<UserId>, ModelError> {
        self.rosters
            .get(&chat)
            .ok_or(ModelError::MissingRoster(chat))
    }

    /// Whether a roster was recorded for the chat
    #[inline]
    #[must_use]
    pub fn contains_chat(&self, chat: ChatId) -> bool {
        self.rosters.contains_key(&chat)
    }

    /// Number of recorded chats
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rosters.len()
    }

    /// Whether no chat was recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rosters.is_empty()
    }

    /// Check that every chat of the tree has a roster
    ///
    /// Reports the first missing chat in breadth-first tree order.
    ///
    /// # Errors
    /// `ModelError::MissingRoster` for the first uncovered chat
    pub fn ensure_covers(&self, tree: &ChatTree) -> Result<(), ModelError> {
        match tree
            .all_chats()
            .into_iter()
            .find(|chat| !self.contains_chat(chat.id()))
        {
            Some(chat) => Err(ModelError::MissingRoster(chat.id())),
            None => Ok(()),
        }
    }
}

impl<I> FromIterator<(ChatId, I)> for MembershipSnapshot
where
    I: IntoIterator<Item = UserId>,
{
    fn from_iter<T: IntoIterator<Item = (ChatId, I)>>(iter: T) -> Self {
        let mut snapshot = Self::new();
        for (chat, members) in iter {
            snapshot.insert(chat, members);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatNode;

    fn users(raw: &[i64]) -> Vec<UserId> {
        raw.iter().copied().map(UserId::new).collect()
    }

    #[test]
    fn missing_entry_is_an_error_not_empty() {
        let snapshot = MembershipSnapshot::new().with_roster(ChatId::new(1), users(&[]));

        assert!(snapshot.members(ChatId::new(1)).unwrap().is_empty());
        assert_eq!(
            snapshot.members(ChatId::new(2)),
            Err(ModelError::MissingRoster(ChatId::new(2)))
        );
    }

    #[test]
    fn insert_deduplicates_members() {
        let snapshot: MembershipSnapshot =
            [(ChatId::new(1), users(&[3, 1, 3, 2]))].into_iter().collect();

        let members: Vec<i64> = snapshot
            .members(ChatId::new(1))
            .unwrap()
            .iter()
            .map(|u| u.get())
            .collect();
        assert_eq!(members, vec![1, 2, 3]);
    }

    #[test]
    fn ensure_covers_reports_first_gap() {
        let tree = ChatTree::new(vec![ChatNode::new(ChatId::new(1), ["Root"])
            .with_children(vec![
                ChatNode::new(ChatId::new(2), ["A"]),
                ChatNode::new(ChatId::new(3), ["B"]),
            ])])
        .unwrap();

        let partial = MembershipSnapshot::new()
            .with_roster(ChatId::new(1), users(&[1]))
            .with_roster(ChatId::new(3), users(&[1]));
        assert_eq!(
            partial.ensure_covers(&tree),
            Err(ModelError::MissingRoster(ChatId::new(2)))
        );

        let full = partial.with_roster(ChatId::new(2), users(&[]));
        assert!(full.ensure_covers(&tree).is_ok());
    }

    #[test]
    fn snapshot_json_uses_string_keys() {
        let snapshot = MembershipSnapshot::new().with_roster(ChatId::new(10), users(&[7]));
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"10":[7]}"#);

        let back: MembershipSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
