//! Protocol event broadcasting.
//!
//! Every accepted mutation is announced as an [`Event`] on a broadcast
//! channel. Each subscriber has an independent buffer; a slow or absent
//! subscriber never blocks the protocol, and late joiners miss events
//! sent before they subscribed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ancora_types::events::{Event, EventType};
use ancora_types::AccountId;
use tokio::sync::broadcast;

/// Default per-subscriber buffer capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Event bus broadcasting protocol events to subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
    sequence: Arc<AtomicU64>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Emit an event to all subscribers.
    ///
    /// Returns the assigned sequence number. The first event is 1 and
    /// numbers never repeat, so a gap in a subscriber's stream means
    /// its buffer overflowed.
    pub fn emit(
        &self,
        event_type: EventType,
        actor: AccountId,
        timestamp: u64,
        payload: serde_json::Value,
    ) -> u64 {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(Event {
            seq,
            event_type,
            actor,
            timestamp,
            payload,
        });
        seq
    }

    /// Subscribe to events. Returns a receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Sequence number of the most recently emitted event.
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
