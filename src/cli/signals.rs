//! Ctrl-C handling while waiting on a job

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

/// Shutdown signal for commands that wait on the service
pub struct ShutdownSignal {
    sender: Arc<watch::Sender<bool>>,
    receiver: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Create a new shutdown signal, not yet listening for Ctrl-C
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    /// Start listening for Ctrl-C. Must be called from within a tokio runtime.
    pub fn install(&self) {
        let sender = Arc::clone(&self.sender);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    debug!("Received Ctrl-C");
                    sender.send_replace(true);
                }
                Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
            }
        });
    }

    #[cfg(test)]
    fn trigger(&self) {
        self.sender.send_replace(true);
    }

    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolve once shutdown is requested
    pub async fn wait(&self) {
        if self.is_shutdown() {
            return;
        }
        let mut receiver = self.receiver.clone();
        // The sender lives as long as self, so this only resolves on a request
        let _ = receiver.wait_for(|requested| *requested).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
