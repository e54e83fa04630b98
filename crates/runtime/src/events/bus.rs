//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::broadcast;

use super::types::{LevelEvent, RoomEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Room entry, completion, and transitions
    Room,
    /// Generation and level outcome
    Level,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Room(RoomEvent),
    Level(LevelEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Room(_) => Topic::Room,
            Event::Level(_) => Topic::Level,
        }
    }
}

impl From<RoomEvent> for Event {
    fn from(event: RoomEvent) -> Self {
        Event::Room(event)
    }
}

impl From<LevelEvent> for Event {
    fn from(event: LevelEvent) -> Self {
        Event::Level(event)
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Clones share the same channels.
#[derive(Clone)]
pub struct EventBus {
    room: broadcast::Sender<Event>,
    level: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            room: broadcast::channel(capacity).0,
            level: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Room => &self.room,
            Topic::Level => &self.level,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();

        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use level_core::NodeId;

    use super::*;

    #[tokio::test]
    async fn events_reach_only_their_topic() {
        let bus = EventBus::new();
        let mut room = bus.subscribe(Topic::Room);
        let mut level = bus.subscribe(Topic::Level);

        bus.publish(LevelEvent::Won { boss: NodeId(3) });

        assert_eq!(
            level.recv().await.unwrap(),
            Event::Level(LevelEvent::Won { boss: NodeId(3) })
        );
        assert!(room.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::with_capacity(4);
        bus.publish(RoomEvent::Completed {
            node: NodeId(1),
            unlocked: 2,
        });
    }
}
