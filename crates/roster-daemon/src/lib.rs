//! Roster Daemon
//!
//! The I/O shell around the audit core:
//! - [`RosterSource`]: where current chat rosters come from
//! - [`SnapshotBuilder`]: all-or-nothing concurrent snapshot collection
//! - [`Notifier`]: where reports go
//! - [`Validator`]: one complete validation run
//!
//! # Example
//!
//! ```rust,ignore
//! use roster_daemon::{ConsoleNotifier, StaticRosterSource, Validator};
//! use roster_model::AuditConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AuditConfig::load("config.json")?;
//! let source = StaticRosterSource::load("rosters.json")?;
//!
//! let summary = Validator::new(config, source, ConsoleNotifier::stdout()).run().await?;
//! println!("clean: {}", summary.is_clean());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod notify;
pub mod roster;
pub mod snapshot;
pub mod validator;

pub use error::{NotifyError, RosterError, ValidationError};
pub use notify::{delivery_header, ConsoleNotifier, ConsoleStream, Notifier};
pub use roster::{RosterSource, StaticRosterSource};
pub use snapshot::{FetchSettings, RosterCollection, SnapshotBuilder};
pub use validator::{ValidationSummary, Validator};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
