//! Graceful stop for the explorer server.

use std::fmt;

use tokio::sync::broadcast;

/// What asked the explorer to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Interrupt,
    Terminate,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::Interrupt => f.write_str("SIGINT"),
            ShutdownReason::Terminate => f.write_str("SIGTERM"),
        }
    }
}

/// Hands out [`ShutdownSignal`]s and fires them all at once.
pub struct Shutdown {
    tx: broadcast::Sender<ShutdownReason>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A future-like handle the HTTP server waits on before draining.
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    pub fn trigger(&self, reason: ShutdownReason) {
        tracing::info!(reason = %reason, "Shutdown requested");
        let _ = self.tx.send(reason);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of [`Shutdown`].
pub struct ShutdownSignal {
    rx: broadcast::Receiver<ShutdownReason>,
}

impl ShutdownSignal {
    /// Wait until shutdown is triggered.
    ///
    /// Returns `None` when the coordinator was dropped without a trigger,
    /// which also means nothing is left to keep the server running.
    pub async fn wait(mut self) -> Option<ShutdownReason> {
        self.rx.recv().await.ok()
    }
}
