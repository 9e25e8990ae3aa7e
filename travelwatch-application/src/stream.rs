// Async, pull-based chunk grouping over a source cursor.

use tracing::debug;

use travelwatch_domain::ports::EventCursor;
use travelwatch_domain::{Chunk, ChunkAccumulator};

/// Reads events one at a time, drops malformed ones and yields a chunk per
/// user. Single pass: once exhausted it keeps returning `None`.
pub struct ChunkStream {
    cursor: Box<dyn EventCursor>,
    accumulator: ChunkAccumulator,
    exhausted: bool,
    events_read: u64,
    events_rejected: u64,
}

impl ChunkStream {
    pub fn new(cursor: Box<dyn EventCursor>) -> Self {
        Self {
            cursor,
            accumulator: ChunkAccumulator::new(),
            exhausted: false,
            events_read: 0,
            events_rejected: 0,
        }
    }

    pub async fn next_chunk(&mut self) -> anyhow::Result<Option<Chunk>> {
        if self.exhausted {
            return Ok(None);
        }
        while let Some(event) = self.cursor.next_event().await? {
            self.events_read += 1;
            if let Err(reason) = event.validate() {
                self.events_rejected += 1;
                debug!(event_id = %event.id, user = %event.user, %reason, "event rejected");
                continue;
            }
            if let Some(chunk) = self.accumulator.push(event) {
                return Ok(Some(chunk));
            }
        }
        self.exhausted = true;
        Ok(self.accumulator.finish())
    }

    pub fn events_read(&self) -> u64 {
        self.events_read
    }

    pub fn events_rejected(&self) -> u64 {
        self.events_rejected
    }

    pub fn order_violations(&self) -> u64 {
        self.accumulator.order_violations()
    }
}
