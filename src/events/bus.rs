//! # Event bus for broadcasting bridge lifecycle events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from the engine and the bridge handle.
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks or awaits.
//! - **Bounded capacity**: a single ring buffer stores recent events.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip
//!   the `n` oldest items.
//! - **No persistence**: events are dropped if no subscriber is active at
//!   send time.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for bridge lifecycle events.
///
/// Cheap to clone (internally holds an `Arc`-backed sender). Multiple
/// publishers can publish concurrently; subscribers receive clones of each
/// event.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (min 1, clamped).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active subscribers.
    ///
    /// If there are no receivers, the event is dropped.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver observing subsequent events.
    ///
    /// A receiver only gets events sent after it subscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
