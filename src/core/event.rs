//! Session lifecycle events and the delivery boundary.
//!
//! The engine never talks to a chat platform or any other frontend; it
//! publishes [`LifecycleEvent`]s through an [`EventSink`] and moves on.
//! Delivery is fire-and-forget; gameplay progress must never wait on it.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::config::{GameMode, SessionId};
use super::player::PlayerId;

/// Closing summary of a finished session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Turns elapsed when the session finished.
    pub turns: u32,
    /// Actions accepted over the session's lifetime.
    pub actions: usize,
}

/// Events emitted by the engine for a delivery collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    /// A queue refresh formed a session.
    MatchFound {
        /// Mode the session was formed for.
        mode: GameMode,
        /// New session's id.
        session: SessionId,
        /// Matched players in join order.
        members: Vec<PlayerId>,
    },
    /// A session's turn advanced (also emitted once at session start).
    TurnAdvanced {
        /// The session whose turn advanced.
        session: SessionId,
        /// Turn-start notifications: cooldowns ready, buffs faded, passive
        /// hook messages.
        notifications: Vec<String>,
    },
    /// A session reached `Finished`.
    SessionEnded {
        /// The finished session.
        session: SessionId,
        /// Sole survivor, if any member was left standing.
        winner: Option<PlayerId>,
        /// Closing summary.
        summary: SessionSummary,
    },
}

/// Delivery boundary.
///
/// Implementations must not block: hand the event to a channel or queue and
/// return.
pub trait EventSink: Send + Sync {
    /// Accept one event for delivery.
    fn publish(&self, event: LifecycleEvent);
}

/// A sink that buffers events for polling.
///
/// Useful for embedders that drain on their own schedule, and for tests.
#[derive(Debug, Default)]
pub struct EventBuffer {
    events: Mutex<Vec<LifecycleEvent>>,
}

impl EventBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all buffered events, leaving the buffer empty.
    pub fn drain(&self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Number of buffered events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for EventBuffer {
    fn publish(&self, event: LifecycleEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_collects_and_drains() {
        let buffer = EventBuffer::new();
        assert!(buffer.is_empty());

        buffer.publish(LifecycleEvent::TurnAdvanced {
            session: SessionId(1),
            notifications: vec!["Warrior's bash is ready.".to_string()],
        });
        assert_eq!(buffer.len(), 1);

        let drained = buffer.drain();
        assert_eq!(drained.len(), 1);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_event_serialization() {
        let event = LifecycleEvent::MatchFound {
            mode: GameMode::Duel,
            session: SessionId(3),
            members: vec![PlayerId::new(1), PlayerId::new(2)],
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: LifecycleEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
