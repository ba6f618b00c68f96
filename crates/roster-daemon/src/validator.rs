//! Validation run
//!
//! One run:
//! 1. Fetch every roster of the configured hierarchy
//! 2. Audit the complete snapshot
//! 3. Render the report
//! 4. Deliver it to every notification target, only if non-empty

use crate::error::ValidationError;
use crate::notify::Notifier;
use crate::roster::RosterSource;
use crate::snapshot::{FetchSettings, SnapshotBuilder};
use roster_audit::{audit, AuditOutcome};
use roster_model::AuditConfig;

/// What a run found and did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationSummary {
    /// Audit result
    pub outcome: AuditOutcome,
    /// Rendered report, `None` when clean
    pub report: Option<String>,
    /// Number of targets the report was delivered to
    pub notifications_sent: usize,
}

impl ValidationSummary {
    /// Whether the hierarchy is consistent
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.outcome.is_clean()
    }
}

/// Runs membership validation for one configuration
#[derive(Debug)]
pub struct Validator<S, N> {
    config: AuditConfig,
    source: S,
    notifier: N,
    settings: FetchSettings,
}

impl<S: RosterSource, N: Notifier> Validator<S, N> {
    /// Create validator with default fetch settings
    #[must_use]
    pub fn new(config: AuditConfig, source: S, notifier: N) -> Self {
        Self {
            config,
            source,
            notifier,
            settings: FetchSettings::default(),
        }
    }

    /// With fetch settings
    #[inline]
    #[must_use]
    pub fn with_fetch_settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Execute one validation run
    ///
    /// # Errors
    /// - `ValidationError::Roster` if any roster could not be fetched
    /// - `ValidationError::Audit` if the report references unknown users or chats
    /// - `ValidationError::Notify` if a delivery fails
    pub async fn run(&self) -> Result<ValidationSummary, ValidationError> {
        let tree = self.config.tree();
        tracing::info!("Starting membership validation");

        let collection = SnapshotBuilder::new(&self.source)
            .with_settings(self.settings)
            .build(tree)
            .await?;

        let outcome = audit(tree, &collection.snapshot)?;
        let report = outcome.render(&collection.directory, &tree.index())?;

        let mut notifications_sent = 0;
        match &report {
            Some(text) => {
                let targets = &self.config.notification().targets;
                if targets.is_empty() {
                    tracing::warn!("Violations found but no notification targets configured");
                }
                for target in targets {
                    self.notifier.deliver(target, text).await?;
                    notifications_sent += 1;
                }
            }
            None => tracing::info!("No membership violations, skipping notification"),
        }

        Ok(ValidationSummary {
            outcome,
            report,
            notifications_sent,
        })
    }
}
