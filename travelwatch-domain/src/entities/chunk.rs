// Chunk entity
// All events of one user, ascending by timestamp

use crate::entities::Event;

#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    user: String,
    events: Vec<Event>,
}

impl Chunk {
    /// Builds a chunk, sorting `events` by timestamp. The sort is stable, so
    /// events sharing a timestamp keep their source order.
    pub fn new(user: String, mut events: Vec<Event>) -> Self {
        events.sort_by_key(|event| event.timestamp);
        Self { user, events }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}
