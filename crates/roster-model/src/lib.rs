//! Roster Model
//!
//! Value types shared by every stage of a membership audit.
//!
//! # Core Concepts
//!
//! - [`ChatNode`] / [`ChatTree`]: the validated chat hierarchy
//! - [`MembershipSnapshot`]: chat id to member ids for one run
//! - [`UserDirectory`]: display profiles for report rendering
//! - [`AuditConfig`]: the configuration document (JSON or YAML)
//!
//! # Example
//!
//! ```rust
//! use roster_model::{ChatId, ChatNode, ChatTree, MembershipSnapshot, UserId};
//!
//! let tree = ChatTree::new(vec![ChatNode::new(ChatId::new(1), ["Main"])
//!     .with_children(vec![ChatNode::new(ChatId::new(2), ["Team"])])])
//!     .unwrap();
//!
//! let snapshot = MembershipSnapshot::new()
//!     .with_roster(ChatId::new(1), [UserId::new(10)])
//!     .with_roster(ChatId::new(2), [UserId::new(10)]);
//!
//! assert!(snapshot.ensure_covers(&tree).is_ok());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod chat;
mod config;
mod error;
mod ids;
mod snapshot;
mod user;

pub use chat::{ChatIndex, ChatNode, ChatTree};
pub use config::{AuditConfig, NotificationConfig, NotificationTarget};
pub use error::{ConfigError, ModelError};
pub use ids::{ChatId, UserId};
pub use snapshot::MembershipSnapshot;
pub use user::{UserDirectory, UserProfile};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
