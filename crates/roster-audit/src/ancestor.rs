//! Ancestor-coverage check
//!
//! Every member of a chat must also be a member of every chat above it on
//! each hierarchy line that contains it.

use crate::error::{roster, AuditResult};
use crate::lines::tree_lines;
use crate::violation::Violation;
use roster_model::{ChatId, ChatTree, MembershipSnapshot};

/// Violations along a single hierarchy line
///
/// Pairs every position `i` (ancestor) with every position `j >= i`
/// (descendant), self-pairs included, and emits one violation per user in
/// `members(line[j]) - members(line[i])`, in ascending user order.
///
/// # Errors
/// `AuditError::MissingRoster` if a chat of the line has no snapshot entry
pub fn find_missing_in_line(
    snapshot: &MembershipSnapshot,
    line: &[ChatId],
) -> AuditResult<Vec<Violation>> {
    let mut missing = Vec::new();

    for (i, &ancestor) in line.iter().enumerate() {
        let ancestor_members = roster(snapshot, ancestor)?;

        for &descendant in &line[i..] {
            let descendant_members = roster(snapshot, descendant)?;

            if descendant_members.is_subset(ancestor_members) {
                continue;
            }

            missing.extend(
                descendant_members
                    .difference(ancestor_members)
                    .map(|&user| Violation::ancestor_missing(user, descendant, ancestor)),
            );
        }
    }

    Ok(missing)
}

/// Violations over every hierarchy line of the tree
///
/// A pair above a branching chat lies on several lines and is reported once
/// per line. [`Report`](crate::Report) groups the duplicates away.
///
/// # Errors
/// `AuditError::MissingRoster` if any chat has no snapshot entry
pub fn find_missing_in_parent(
    tree: &ChatTree,
    snapshot: &MembershipSnapshot,
) -> AuditResult<Vec<Violation>> {
    let mut missing = Vec::new();

    for line in tree_lines(tree) {
        let found = find_missing_in_line(snapshot, &line)?;
        if !found.is_empty() {
            tracing::debug!("Line {:?}: {} ancestor violations", line, found.len());
        }
        missing.extend(found);
    }

    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuditError;
    use roster_test_utils::{chat, ids, snapshot, user};

    #[test]
    fn single_chat_has_only_self_pair() {
        let tree = ChatTree::new(vec![chat(1, "Solo")]).unwrap();
        let snap = snapshot(&[(1, &[5, 6, 7])]);

        assert!(find_missing_in_parent(&tree, &snap).unwrap().is_empty());
    }

    #[test]
    fn grandchild_checked_against_every_ancestor() {
        let snap = snapshot(&[(1, &[]), (2, &[9]), (3, &[9])]);

        let found = find_missing_in_line(&snap, &ids(&[1, 2, 3])).unwrap();
        assert_eq!(
            found,
            vec![
                Violation::ancestor_missing(user(9), ChatId::new(2), ChatId::new(1)),
                Violation::ancestor_missing(user(9), ChatId::new(3), ChatId::new(1)),
            ]
        );
    }

    #[test]
    fn parent_extra_members_are_fine() {
        let snap = snapshot(&[(1, &[1, 2, 3]), (2, &[2])]);
        assert!(find_missing_in_line(&snap, &ids(&[1, 2])).unwrap().is_empty());
    }

    #[test]
    fn missing_roster_aborts() {
        let tree = ChatTree::new(vec![chat(1, "A").with_children(vec![chat(2, "B")])]).unwrap();
        let snap = snapshot(&[(1, &[1])]);

        assert_eq!(
            find_missing_in_parent(&tree, &snap),
            Err(AuditError::MissingRoster(ChatId::new(2)))
        );
    }
}
