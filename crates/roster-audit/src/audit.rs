//! Combined audit over a tree and snapshot

use crate::ancestor::find_missing_in_parent;
use crate::children::find_missing_in_children;
use crate::error::{AuditError, AuditResult};
use crate::report::{format_report, Report};
use crate::violation::Violation;
use roster_model::{ChatIndex, ChatTree, MembershipSnapshot, UserDirectory};

/// Result of one audit run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditOutcome {
    violations: Vec<Violation>,
    ancestor_count: usize,
    child_coverage_count: usize,
}

impl AuditOutcome {
    /// All violations, ancestor violations first
    #[inline]
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Take ownership of the violations
    #[inline]
    #[must_use]
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// Number of ancestor-coverage violations
    #[inline]
    #[must_use]
    pub fn ancestor_count(&self) -> usize {
        self.ancestor_count
    }

    /// Number of child-coverage violations
    #[inline]
    #[must_use]
    pub fn child_coverage_count(&self) -> usize {
        self.child_coverage_count
    }

    /// Whether no violation was found
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Grouped view of the violations
    #[must_use]
    pub fn report(&self) -> Report {
        Report::from_violations(&self.violations)
    }

    /// Rendered report, `None` when clean
    ///
    /// # Errors
    /// See [`Report::render`]
    pub fn render(
        &self,
        users: &UserDirectory,
        chats: &ChatIndex<'_>,
    ) -> AuditResult<Option<String>> {
        format_report(users, chats, &self.violations)
    }
}

/// Run both checks
///
/// The snapshot must cover every chat of the tree; this is checked before any
/// work is done. The two checks share only immutable data and run in
/// parallel.
///
/// # Errors
/// `AuditError::MissingRoster` for the first chat without a snapshot entry
pub fn audit(tree: &ChatTree, snapshot: &MembershipSnapshot) -> AuditResult<AuditOutcome> {
    if let Some(chat) = tree
        .all_chats()
        .into_iter()
        .find(|chat| !snapshot.contains_chat(chat.id()))
    {
        return Err(AuditError::MissingRoster(chat.id()));
    }

    let (ancestors, children) = rayon::join(
        || find_missing_in_parent(tree, snapshot),
        || find_missing_in_children(tree, snapshot),
    );
    let mut violations = ancestors?;
    let children = children?;

    let ancestor_count = violations.len();
    let child_coverage_count = children.len();
    violations.extend(children);

    if violations.is_empty() {
        tracing::info!("Audit clean: {} chats checked", snapshot.len());
    } else {
        tracing::warn!(
            "Audit found {} ancestor and {} child coverage violations",
            ancestor_count,
            child_coverage_count
        );
    }

    Ok(AuditOutcome {
        violations,
        ancestor_count,
        child_coverage_count,
    })
}
