//! Graceful stop for the HTTP server.
//!
//! A `Shutdown` fans one signal out to every subscriber. The server binary
//! wires it to Ctrl+C; tests trigger it directly.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a coordinator with no subscribers yet.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A receiver that resolves once `trigger` runs or this coordinator is dropped.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every current subscriber. Later subscribers do not see it.
    pub fn trigger(&self) {
        let sent = self.tx.send(()).unwrap_or(0);
        tracing::debug!(subscribers = sent, "Shutdown triggered");
    }

    /// Wait for Ctrl+C, then trigger.
    ///
    /// If the handler cannot be installed the error is logged and the
    /// coordinator is dropped, which still releases every subscriber.
    pub async fn trigger_on_ctrl_c(self) {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Ctrl+C received");
                self.trigger();
            }
            Err(e) => tracing::error!(error = %e, "Failed to install Ctrl+C handler"),
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
