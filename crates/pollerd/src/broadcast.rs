//! Alert fan-out over a tokio broadcast channel.

use driftwatch_common::AlertSink;
use driftwatch_types::AlertEvent;
use tokio::sync::broadcast;

/// Default channel capacity; a subscriber lagging behind this many events
/// loses the oldest ones rather than blocking the poller.
const DEFAULT_CAPACITY: usize = 64;

/// [`AlertSink`] backed by `tokio::sync::broadcast`.
///
/// Events are delivered to whoever is subscribed at send time and dropped
/// when nobody is. Nothing is persisted.
pub struct BroadcastAlertSink {
    tx: broadcast::Sender<AlertEvent>,
}

impl BroadcastAlertSink {
    /// Creates a sink with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a sink with an explicit channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Opens a new subscription receiving events broadcast from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<AlertEvent> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastAlertSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertSink for BroadcastAlertSink {
    fn broadcast(&self, event: AlertEvent) {
        // Err means no subscribers right now; the event is simply dropped.
        let _ = self.tx.send(event);
    }
}
