//! In-process notifier backed by a `tokio::sync::broadcast` channel.
//!
//! [`Notifier`] is the fan-out hub for [`BatchEvent`]s. It is designed to be
//! shared via `Arc<Notifier>` between the job processor and any number of
//! UI-side subscribers.

use tokio::sync::broadcast;

use crate::event::BatchEvent;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out notifier.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`BatchEvent`], in publication
/// order.
pub struct Notifier {
    sender: broadcast::Sender<BatchEvent>,
}

impl Notifier {
    /// Create a notifier with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed events are dropped and
    /// slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// a run must never stall because nobody is watching it.
    pub fn publish(&self, event: BatchEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this notifier.
    pub fn subscribe(&self) -> broadcast::Receiver<BatchEvent> {
        self.sender.subscribe()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
