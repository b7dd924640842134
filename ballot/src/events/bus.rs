//! Event bus for ballot engines
//!
//! Pub/sub over a Tokio broadcast channel. Publishing never blocks and works
//! from synchronous code; subscribers may be sync (`try_recv`) or async.

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

use super::types::BallotEvent;

/// Channel capacity for broadcast
const CHANNEL_CAPACITY: usize = 256;

/// Shared reference to EventBus
pub type SharedEventBus = Arc<EventBus>;

/// Broadcast event bus
pub struct EventBus {
    sender: broadcast::Sender<BallotEvent>,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Create a shared reference to this event bus
    pub fn shared(self) -> SharedEventBus {
        Arc::new(self)
    }

    /// Publish an event to all subscribers, returning how many received it.
    ///
    /// Having no subscribers is not an error.
    pub fn publish(&self, event: BallotEvent) -> usize {
        let event_type = event.event_type();

        match self.sender.send(event) {
            Ok(count) => {
                debug!(event_type, receivers = count, "Event published");
                count
            }
            Err(_) => {
                debug!(event_type, "Event published (no receivers)");
                0
            }
        }
    }

    /// Subscribe to receive events
    pub fn subscribe(&self) -> broadcast::Receiver<BallotEvent> {
        self.sender.subscribe()
    }

    /// Get the number of current subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Check if the bus has any subscribers
    pub fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 0
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Drain every event currently queued on `receiver` without waiting
pub fn drain(receiver: &mut broadcast::Receiver<BallotEvent>) -> Vec<BallotEvent> {
    let mut events = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                debug!(skipped, "Subscriber lagged; oldest events dropped");
            }
            Err(_) => break,
        }
    }
    events
}
