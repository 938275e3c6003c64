// MIT License - Copyright (c) 2026 Peter Wright
// Coordinator events

use chrono::{DateTime, Utc};

/// Events emitted by the coordinator.
///
/// Listeners subscribe via `coordinator.subscribe()` and re-read entity
/// state whenever a refresh lands.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinatorEvent {
    /// A new device snapshot was applied
    Refreshed { at: DateTime<Utc> },
    /// The latest fetch could not be applied; entities become unavailable
    RefreshFailed { reason: String },
}

/// Type alias for the broadcast sender.
pub type EventSender = tokio::sync::broadcast::Sender<CoordinatorEvent>;

/// Type alias for the broadcast receiver.
pub type EventReceiver = tokio::sync::broadcast::Receiver<CoordinatorEvent>;

/// Create a new event channel with the given capacity.
pub fn event_channel(capacity: usize) -> (EventSender, EventReceiver) {
    tokio::sync::broadcast::channel(capacity)
}
