//! Report delivery

use crate::error::NotifyError;
use async_trait::async_trait;
use roster_model::NotificationTarget;
use tokio::io::AsyncWriteExt;

/// Delivers a rendered report to one destination
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `report` to `target`
    async fn deliver(&self, target: &NotificationTarget, report: &str) -> Result<(), NotifyError>;
}

/// Console stream a [`ConsoleNotifier`] writes to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleStream {
    /// Standard output
    #[default]
    Stdout,
    /// Standard error
    Stderr,
}

/// Writes each delivery to the console under a header naming the destination
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier {
    stream: ConsoleStream,
}

impl ConsoleNotifier {
    /// Create notifier writing to stdout
    #[inline]
    #[must_use]
    pub fn stdout() -> Self {
        Self {
            stream: ConsoleStream::Stdout,
        }
    }

    /// Create notifier writing to stderr
    #[inline]
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            stream: ConsoleStream::Stderr,
        }
    }

    /// Stream in use
    #[inline]
    #[must_use]
    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }
}

/// Header line printed before a report delivered to `target`
#[must_use]
pub fn delivery_header(target: &NotificationTarget) -> String {
    format!("=== Membership report for \"{}\" ({}) ===", target.name, target.id)
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn deliver(&self, target: &NotificationTarget, report: &str) -> Result<(), NotifyError> {
        let text = format!("{}\n{report}\n", delivery_header(target));
        match self.stream {
            ConsoleStream::Stdout => {
                let mut out = tokio::io::stdout();
                out.write_all(text.as_bytes()).await?;
                out.flush().await?;
            }
            ConsoleStream::Stderr => {
                let mut out = tokio::io::stderr();
                out.write_all(text.as_bytes()).await?;
                out.flush().await?;
            }
        }

        tracing::info!("Delivered report to {} ({})", target.name, target.id);
        Ok(())
    }
}
