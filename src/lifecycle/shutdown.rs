//! Stop switch for a running proxy.
//!
//! `main` hands one receiver to `HttpServer::run` and the sender to the
//! signal task; integration tests keep the sender and fire it when their
//! proxy handle drops. Firing lets axum finish in-flight relays before the
//! listener closes.

use tokio::sync::broadcast;

/// Broadcasts a single "stop serving" event to every subscribed server.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        // One slot: the event is sent at most once
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver for `HttpServer::run`. Take it before triggering; receivers
    /// created afterwards never see the event.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every subscribed server to drain and stop. A no-op once all
    /// servers have exited.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Servers still waiting for the event.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
