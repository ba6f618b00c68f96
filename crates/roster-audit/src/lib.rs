//! Roster Audit
//!
//! Membership reconciliation across a chat hierarchy. Pure, synchronous and
//! I/O-free: it works on an already materialized [`ChatTree`] and
//! [`MembershipSnapshot`].
//!
//! # Core Concepts
//!
//! - [`hierarchy_lines`]: root-to-leaf paths of the tree
//! - [`find_missing_in_parent`]: descendant members missing from an ancestor
//! - [`find_missing_in_children`]: members of flagged chats absent from their subtree
//! - [`Report`] / [`format_report`]: grouping and human-readable rendering
//! - [`audit`]: both checks in one call
//!
//! # Example
//!
//! ```rust
//! use roster_audit::audit;
//! use roster_model::{ChatId, ChatNode, ChatTree, MembershipSnapshot, UserId};
//!
//! let tree = ChatTree::new(vec![ChatNode::new(ChatId::new(1), ["Main"])
//!     .with_children(vec![ChatNode::new(ChatId::new(2), ["Team"])])])
//!     .unwrap();
//! let snapshot = MembershipSnapshot::new()
//!     .with_roster(ChatId::new(1), Vec::<UserId>::new())
//!     .with_roster(ChatId::new(2), [UserId::new(10)]);
//!
//! let outcome = audit(&tree, &snapshot).unwrap();
//! assert_eq!(outcome.ancestor_count(), 1);
//! ```
//!
//! [`ChatTree`]: roster_model::ChatTree
//! [`MembershipSnapshot`]: roster_model::MembershipSnapshot

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod ancestor;
mod audit;
mod children;
mod error;
mod lines;
mod report;
mod violation;

pub use ancestor::{find_missing_in_line, find_missing_in_parent};
pub use audit::{audit, AuditOutcome};
pub use children::{covering_members, find_missing_in_children};
pub use error::{AuditError, AuditResult};
pub use lines::{hierarchy_lines, tree_lines, HierarchyLine};
pub use report::{format_report, Report};
pub use violation::{MissingContext, Violation};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
