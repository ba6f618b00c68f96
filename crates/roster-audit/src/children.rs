//! Child-coverage check
//!
//! Chats flagged with `members_must_be_in_any_child_chat` require each of
//! their members to appear somewhere in the subtree below them. Children may
//! hold members the parent lacks; that direction is the ancestor check's job.

use crate::error::{roster, AuditResult};
use crate::violation::Violation;
use roster_model::{ChatNode, ChatTree, MembershipSnapshot, UserId};
use std::collections::BTreeSet;

/// Union of the members of every chat strictly below `chat`
///
/// # Errors
/// `AuditError::MissingRoster` if a descendant has no snapshot entry
pub fn covering_members(
    chat: &ChatNode,
    snapshot: &MembershipSnapshot,
) -> AuditResult<BTreeSet<UserId>> {
    let mut covering = BTreeSet::new();
    for node in chat.descendants() {
        covering.extend(roster(snapshot, node.id())?.iter().copied());
    }
    Ok(covering)
}

/// Violations for every flagged chat in the tree
///
/// A flagged chat without children has an empty covering set, so all of its
/// members are reported.
///
/// # Errors
/// `AuditError::MissingRoster` if a flagged chat or one of its descendants
/// has no snapshot entry
pub fn find_missing_in_children(
    tree: &ChatTree,
    snapshot: &MembershipSnapshot,
) -> AuditResult<Vec<Violation>> {
    let mut missing = Vec::new();

    for chat in tree
        .all_chats()
        .into_iter()
        .filter(|chat| chat.requires_member_in_any_child())
    {
        let members = roster(snapshot, chat.id())?;
        let covering = covering_members(chat, snapshot)?;

        let before = missing.len();
        missing.extend(
            members
                .difference(&covering)
                .map(|&user| Violation::child_coverage_missing(user, chat.id())),
        );

        tracing::debug!(
            "Chat {} covers {} of {} members in child chats",
            chat.id(),
            members.len() - (missing.len() - before),
            members.len()
        );
    }

    Ok(missing)
}
