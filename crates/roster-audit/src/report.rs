//! Violation aggregation and report rendering
//!
//! Violations are grouped by user (first-seen order), then by
//! [`MissingContext`]. Each group collects the chats where the user was found,
//! which also folds away duplicate violations produced by overlapping lines.

use crate::error::{AuditError, AuditResult};
use crate::violation::{MissingContext, Violation};
use indexmap::{IndexMap, IndexSet};
use roster_model::{ChatId, ChatIndex, UserDirectory, UserId};

/// Violations grouped for display
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    users: IndexMap<UserId, IndexMap<MissingContext, IndexSet<ChatId>>>,
}

impl Report {
    /// Group violations by user and missing context
    #[must_use]
    pub fn from_violations<'a>(violations: impl IntoIterator<Item = &'a Violation>) -> Self {
        let mut users: IndexMap<UserId, IndexMap<MissingContext, IndexSet<ChatId>>> =
            IndexMap::new();

        for violation in violations {
            users
                .entry(violation.user_id())
                .or_default()
                .entry(violation.context())
                .or_default()
                .insert(violation.present_in());
        }

        Self { users }
    }

    /// Whether there is nothing to report
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Number of affected users
    #[inline]
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Affected users in first-seen order
    pub fn users(&self) -> impl Iterator<Item = UserId> + '_ {
        self.users.keys().copied()
    }

    /// Missing contexts of a user, each with the chats the user was found in
    #[inline]
    #[must_use]
    pub fn contexts(&self, user: UserId) -> Option<&IndexMap<MissingContext, IndexSet<ChatId>>> {
        self.users.get(&user)
    }

    /// Render as human-readable text
    ///
    /// One paragraph per user:
    ///
    /// ```text
    ///
    /// User "First Last @username phone" is missing in:
    ///      "Ancestor" even though they are in "Child", "Other child"
    ///      any child chat of "Parent"
    /// ```
    ///
    /// # Errors
    /// - `AuditError::UnknownUser` if a user has no profile
    /// - `AuditError::UnknownChat` if a chat is not in the index
    pub fn render(&self, users: &UserDirectory, chats: &ChatIndex<'_>) -> AuditResult<String> {
        let mut out = String::new();

        for (user_id, contexts) in &self.users {
            let profile = users
                .get(*user_id)
                .ok_or(AuditError::UnknownUser(*user_id))?;
            out.push('\n');
            out.push_str(&format!("User \"{profile}\" is missing in:\n"));

            for (context, present_in) in contexts {
                let present = quoted_names(chats, present_in)?;
                match context {
                    MissingContext::SpecificChat(missing) => out.push_str(&format!(
                        "\t \"{}\" even though they are in {present}\n",
                        chat_name(chats, *missing)?
                    )),
                    MissingContext::AnyChildChat => {
                        out.push_str(&format!("\t any child chat of {present}\n"));
                    }
                }
            }
        }

        Ok(out)
    }
}

fn chat_name<'a>(chats: &ChatIndex<'a>, id: ChatId) -> AuditResult<&'a str> {
    chats.canonical_name(id).ok_or(AuditError::UnknownChat(id))
}

fn quoted_names(chats: &ChatIndex<'_>, ids: &IndexSet<ChatId>) -> AuditResult<String> {
    let names = ids
        .iter()
        .map(|&id| chat_name(chats, id).map(|name| format!("\"{name}\"")))
        .collect::<AuditResult<Vec<_>>>()?;
    Ok(names.join(", "))
}

/// Render violations, or `None` when there are none
///
/// `None` lets callers skip notification entirely instead of sending an
/// empty report.
///
/// # Errors
/// See [`Report::render`]
pub fn format_report(
    users: &UserDirectory,
    chats: &ChatIndex<'_>,
    violations: &[Violation],
) -> AuditResult<Option<String>> {
    if violations.is_empty() {
        return Ok(None);
    }

    Report::from_violations(violations)
        .render(users, chats)
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roster_model::{ChatTree, UserProfile};
    use roster_test_utils::{chat, user};

    fn tree() -> ChatTree {
        ChatTree::new(vec![chat(1, "Company").with_children(vec![
            chat(2, "Engineering"),
            chat(3, "Sales"),
        ])])
        .unwrap()
    }

    fn directory() -> UserDirectory {
        [
            UserProfile::new(user(7))
                .with_name("Grace", "Hopper")
                .with_username("grace")
                .with_phone("+1555"),
            UserProfile::new(user(8)).with_username("linus"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn groups_by_user_then_context() {
        let violations = vec![
            Violation::ancestor_missing(user(7), ChatId::new(2), ChatId::new(1)),
            Violation::child_coverage_missing(user(8), ChatId::new(1)),
            Violation::ancestor_missing(user(7), ChatId::new(3), ChatId::new(1)),
            Violation::ancestor_missing(user(7), ChatId::new(2), ChatId::new(1)),
        ];

        let report = Report::from_violations(&violations);
        assert_eq!(report.users().collect::<Vec<_>>(), vec![user(7), user(8)]);

        let contexts = report.contexts(user(7)).unwrap();
        assert_eq!(contexts.len(), 1);
        let present: Vec<ChatId> = contexts[&MissingContext::SpecificChat(ChatId::new(1))]
            .iter()
            .copied()
            .collect();
        assert_eq!(present, vec![ChatId::new(2), ChatId::new(3)]);
    }

    #[test]
    fn child_context_never_collapses_with_chat_context() {
        let violations = vec![
            Violation::ancestor_missing(user(7), ChatId::new(2), ChatId::new(1)),
            Violation::child_coverage_missing(user(7), ChatId::new(1)),
        ];

        let report = Report::from_violations(&violations);
        assert_eq!(report.contexts(user(7)).unwrap().len(), 2);
    }

    #[test]
    fn renders_paragraph_per_user() {
        let tree = tree();
        let violations = vec![
            Violation::ancestor_missing(user(7), ChatId::new(2), ChatId::new(1)),
            Violation::ancestor_missing(user(7), ChatId::new(3), ChatId::new(1)),
            Violation::child_coverage_missing(user(8), ChatId::new(1)),
        ];

        let text = format_report(&directory(), &tree.index(), &violations)
            .unwrap()
            .unwrap();

        assert_eq!(
            text,
            "\nUser \"Grace Hopper @grace +1555\" is missing in:\n\
             \t \"Company\" even though they are in \"Engineering\", \"Sales\"\n\
             \nUser \"@linus\" is missing in:\n\
             \t any child chat of \"Company\"\n"
        );
    }

    #[test]
    fn empty_input_renders_nothing() {
        let tree = tree();
        assert_eq!(format_report(&directory(), &tree.index(), &[]).unwrap(), None);
        assert!(Report::from_violations(std::iter::empty()).is_empty());
    }

    #[test]
    fn unknown_user_is_fatal() {
        let tree = tree();
        let violations = vec![Violation::child_coverage_missing(user(99), ChatId::new(1))];

        assert_eq!(
            format_report(&directory(), &tree.index(), &violations),
            Err(AuditError::UnknownUser(user(99)))
        );
    }

    #[test]
    fn unknown_chat_is_fatal() {
        let tree = tree();
        let violations = vec![Violation::ancestor_missing(user(7), ChatId::new(2), ChatId::new(42))];

        assert_eq!(
            format_report(&directory(), &tree.index(), &violations),
            Err(AuditError::UnknownChat(ChatId::new(42)))
        );
    }
}
