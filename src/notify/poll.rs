//! Per-connection poll loop.
//!
//! # State Machine
//! ```text
//! CONNECTED → (WAIT → CHECK)* → DISCONNECTED
//! ```
//! - WAIT sleeps for the configured interval; it is the only place the loop
//!   parks apart from the close signal
//! - CHECK asks the store to reload; on change a reload notice goes out
//! - Any exit path unregisters the connection

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::CatalogStore;
use crate::config::NotifyMode;
use crate::notify::connection::ConnectionId;
use crate::notify::message::Notice;
use crate::notify::registry::ConnectionRegistry;
use crate::observability::metrics;

/// Why a poll loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    /// The remote peer closed the connection.
    PeerClosed,
    /// The process is shutting down.
    Shutdown,
    /// The notice could not be delivered to this connection.
    SendFailed,
    /// The reload check itself failed unexpectedly.
    CheckFailed,
}

/// Wait-and-check cycle bound to one registered connection.
pub struct PollLoop {
    id: ConnectionId,
    store: Arc<CatalogStore>,
    registry: Arc<ConnectionRegistry>,
    interval: Duration,
    mode: NotifyMode,
}

impl PollLoop {
    pub fn new(
        id: ConnectionId,
        store: Arc<CatalogStore>,
        registry: Arc<ConnectionRegistry>,
        interval: Duration,
        mode: NotifyMode,
    ) -> Self {
        Self {
            id,
            store,
            registry,
            interval,
            mode,
        }
    }

    /// Run until `closed` resolves or a check/send fails.
    pub async fn run<F>(self, closed: F) -> PollExit
    where
        F: Future<Output = PollExit>,
    {
        tokio::pin!(closed);

        let exit = loop {
            tokio::select! {
                biased;
                reason = &mut closed => break reason,
                _ = tokio::time::sleep(self.interval) => {}
            }

            if let Err(exit) = self.check().await {
                break exit;
            }
        };

        self.registry.disconnect(self.id);
        tracing::debug!(connection = %self.id, reason = ?exit, "Poll loop finished");
        exit
    }

    async fn check(&self) -> Result<(), PollExit> {
        let store = self.store.clone();
        let changed = tokio::task::spawn_blocking(move || store.reload_if_changed())
            .await
            .map_err(|e| {
                tracing::error!(connection = %self.id, error = %e, "Reload check failed");
                PollExit::CheckFailed
            })?;

        if !changed {
            return Ok(());
        }

        let text = Notice::reload().to_text().map_err(|e| {
            tracing::error!(connection = %self.id, error = %e, "Failed to encode reload notice");
            PollExit::CheckFailed
        })?;

        match self.mode {
            NotifyMode::SelfOnly => {
                if !self.registry.send(self.id, &text) {
                    return Err(PollExit::SendFailed);
                }
                metrics::record_notifications(1);
            }
            NotifyMode::Broadcast => {
                let delivered = self.registry.broadcast(&text);
                metrics::record_notifications(delivered);
                tracing::info!(connection = %self.id, delivered, "Reload notice broadcast");
                if !self.registry.contains(self.id) {
                    return Err(PollExit::SendFailed);
                }
            }
        }

        Ok(())
    }
}
