//! Snapshot building
//!
//! Fetches the roster of every chat in the hierarchy with bounded concurrency
//! and a per-chat deadline. The result is all-or-nothing: the first failed or
//! late fetch aborts the build and drops the fetches still in flight, so the
//! audit never sees a partial snapshot.

use crate::error::RosterError;
use crate::roster::RosterSource;
use futures::stream::{self, StreamExt};
use roster_model::{ChatNode, ChatTree, MembershipSnapshot, UserDirectory};
use std::time::Duration;

/// Fetch limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    /// Maximum fetches in flight
    pub concurrency: usize,
    /// Deadline for a single chat
    pub timeout: Duration,
}

impl FetchSettings {
    /// With concurrency limit (at least 1)
    #[inline]
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// With per-chat deadline
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Everything fetched for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterCollection {
    /// Chat id to member ids
    pub snapshot: MembershipSnapshot,
    /// Profiles of every member seen in any chat
    pub directory: UserDirectory,
}

/// Builds a complete [`RosterCollection`] from a [`RosterSource`]
#[derive(Debug)]
pub struct SnapshotBuilder<'a, S> {
    source: &'a S,
    settings: FetchSettings,
}

impl<'a, S: RosterSource> SnapshotBuilder<'a, S> {
    /// Create builder with default settings
    #[inline]
    #[must_use]
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            settings: FetchSettings::default(),
        }
    }

    /// With fetch settings
    #[inline]
    #[must_use]
    pub fn with_settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Fetch the roster of every chat in the tree
    ///
    /// # Errors
    /// - `RosterError::Timeout` if a chat misses its deadline
    /// - any error returned by the source
    pub async fn build(&self, tree: &ChatTree) -> Result<RosterCollection, RosterError> {
        let chats: Vec<_> = tree.all_chats().into_iter().map(ChatNode::id).collect();
        let timeout = self.settings.timeout;
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        let source = self.source;

        tracing::info!(
            "Fetching rosters for {} chats (concurrency {})",
            chats.len(),
            self.settings.concurrency
        );

        let mut fetches = stream::iter(chats)
            .map(|chat| async move {
                let members = tokio::time::timeout(timeout, source.members(chat))
                    .await
                    .map_err(|_| RosterError::Timeout { chat, timeout_ms })??;
                Ok::<_, RosterError>((chat, members))
            })
            .buffer_unordered(self.settings.concurrency.max(1));

        let mut collection = RosterCollection::default();
        while let Some(fetched) = fetches.next().await {
            let (chat, profiles) = match fetched {
                Ok(fetched) => fetched,
                Err(err) => {
                    tracing::error!("Roster fetch failed: {}", err);
                    return Err(err);
                }
            };

            tracing::debug!("Fetched {} members of chat {}", profiles.len(), chat);
            collection
                .snapshot
                .insert(chat, profiles.iter().map(|profile| profile.id));
            collection.directory.extend(profiles);
        }

        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::StaticRosterSource;
    use roster_model::ChatId;
    use roster_test_utils::{chat, profile, user};

    fn tree() -> ChatTree {
        ChatTree::new(vec![chat(1, "Root").with_children(vec![chat(2, "A"), chat(3, "B")])]).unwrap()
    }

    fn source() -> StaticRosterSource {
        StaticRosterSource::new()
            .with_roster(ChatId::new(1), vec![profile(10), profile(11)])
            .with_roster(ChatId::new(2), vec![profile(10)])
            .with_roster(ChatId::new(3), vec![profile(12)])
    }

    #[tokio::test]
    async fn builds_complete_snapshot_and_directory() {
        let source = source();
        let collection = SnapshotBuilder::new(&source).build(&tree()).await.unwrap();

        assert_eq!(collection.snapshot.len(), 3);
        assert!(collection.snapshot.ensure_covers(&tree()).is_ok());
        assert!(collection
            .snapshot
            .members(ChatId::new(3))
            .unwrap()
            .contains(&user(12)));
        assert_eq!(collection.directory.len(), 3);
    }

    #[tokio::test]
    async fn unknown_chat_aborts_build() {
        let source = StaticRosterSource::new().with_roster(ChatId::new(1), vec![profile(10)]);

        let err = SnapshotBuilder::new(&source).build(&tree()).await.unwrap_err();
        assert!(matches!(err, RosterError::ChatNotFound(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_chat_times_out() {
        let source = source().with_delay(ChatId::new(3), Duration::from_secs(60));
        let settings = FetchSettings::default()
            .with_concurrency(1)
            .with_timeout(Duration::from_secs(5));

        let err = SnapshotBuilder::new(&source)
            .with_settings(settings)
            .build(&tree())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RosterError::Timeout { chat, timeout_ms: 5000 } if chat == ChatId::new(3)
        ));
    }

    #[test]
    fn concurrency_never_zero() {
        assert_eq!(FetchSettings::default().with_concurrency(0).concurrency, 1);
    }
}
