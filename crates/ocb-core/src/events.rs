//! Change-event fanout for real-time board subscribers.
//!
//! Every successful mutation publishes a [`BoardEvent`] through the board's
//! [`EventHub`]. Delivery is at-most-once and best-effort: publishing with
//! no subscribers is a no-op, and a subscriber that falls behind the channel
//! capacity loses the oldest events rather than stalling the publisher.
//! A failed delivery never propagates back into the mutation that caused it.

use serde_json::json;
use tokio::sync::broadcast;

use crate::error::Result;
use crate::models::Task;

/// Default number of events buffered per lagging subscriber.
const DEFAULT_CAPACITY: usize = 64;

/// A change notification describing one board mutation.
#[derive(Debug, Clone)]
pub enum BoardEvent {
    /// A task was created
    Created(Task),

    /// A task was updated (field change, child change, or archival)
    Updated(Task),

    /// A task was deleted; only the id survives
    Deleted {
        /// ID of the deleted task
        id: u64,
    },
}

impl BoardEvent {
    /// The wire event name, e.g. `task:updated`.
    pub fn name(&self) -> &'static str {
        match self {
            BoardEvent::Created(_) => "task:created",
            BoardEvent::Updated(_) => "task:updated",
            BoardEvent::Deleted { .. } => "task:deleted",
        }
    }

    /// Serializes the event to its wire message: `{"event": ..., "data": ...}`.
    pub fn to_message(&self) -> Result<String> {
        let data = match self {
            BoardEvent::Created(task) | BoardEvent::Updated(task) => serde_json::to_value(task)?,
            BoardEvent::Deleted { id } => json!({ "id": id }),
        };
        let message = json!({ "event": self.name(), "data": data });
        Ok(serde_json::to_string(&message)?)
    }
}

/// Process-wide registry of live event subscribers.
///
/// Owned by the board and handed to transport layers (the WebSocket
/// endpoint) through [`EventHub::subscribe`]. Construction and teardown are
/// explicit; there is no ambient global channel.
#[derive(Debug, Clone)]
pub struct EventHub {
    sender: broadcast::Sender<BoardEvent>,
}

impl EventHub {
    /// Creates a hub buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all current subscribers.
    ///
    /// Fire-and-forget: an absent audience is not an error.
    pub fn publish(&self, event: BoardEvent) {
        let name = event.name();
        match self.sender.send(event) {
            Ok(receivers) => log::debug!("broadcast {name} to {receivers} subscriber(s)"),
            Err(_) => log::debug!("broadcast {name} dropped: no subscribers"),
        }
    }

    /// Registers a new subscriber and returns its receiving end.
    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.sender.subscribe()
    }

    /// Number of currently connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
