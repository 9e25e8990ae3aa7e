// Splits a user-sorted event stream into per-user chunks.

use std::mem;

use crate::entities::{Chunk, Event};

/// Push-based core of the grouping, shared by the synchronous
/// [`ChunkGrouper`] and by async cursor adapters.
#[derive(Debug, Default)]
pub struct ChunkAccumulator {
    current_user: Option<String>,
    pending: Vec<Event>,
    order_violations: u64,
}

impl ChunkAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the next event. Returns the previous user's chunk when `event`
    /// opens a new user.
    pub fn push(&mut self, event: Event) -> Option<Chunk> {
        if self.current_user.as_deref() == Some(event.user.as_str()) {
            self.pending.push(event);
            return None;
        }
        if let Some(current) = &self.current_user {
            if event.user < *current {
                self.order_violations += 1;
            }
        }
        let closed = self.close();
        self.current_user = Some(event.user.clone());
        self.pending.push(event);
        closed
    }

    /// Flushes the open chunk once the input is exhausted.
    pub fn finish(&mut self) -> Option<Chunk> {
        self.close()
    }

    /// Times the source yielded a user sorting before its predecessor.
    pub fn order_violations(&self) -> u64 {
        self.order_violations
    }

    fn close(&mut self) -> Option<Chunk> {
        let user = self.current_user.take()?;
        Some(Chunk::new(user, mem::take(&mut self.pending)))
    }
}

/// Lazy, single-pass iterator of chunks over events sorted by user.
#[derive(Debug)]
pub struct ChunkGrouper<I> {
    events: I,
    accumulator: ChunkAccumulator,
    exhausted: bool,
}

impl<I> ChunkGrouper<I>
where
    I: Iterator<Item = Event>,
{
    pub fn new(events: I) -> Self {
        Self {
            events,
            accumulator: ChunkAccumulator::new(),
            exhausted: false,
        }
    }

    pub fn order_violations(&self) -> u64 {
        self.accumulator.order_violations()
    }
}

impl<I> Iterator for ChunkGrouper<I>
where
    I: Iterator<Item = Event>,
{
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.exhausted {
            return None;
        }
        for event in self.events.by_ref() {
            if let Some(chunk) = self.accumulator.push(event) {
                return Some(chunk);
            }
        }
        self.exhausted = true;
        self.accumulator.finish()
    }
}

pub fn group_chunks<I>(events: I) -> ChunkGrouper<I::IntoIter>
where
    I: IntoIterator<Item = Event>,
{
    ChunkGrouper::new(events.into_iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::EventId;
    use time::macros::datetime;
    use time::{Duration, OffsetDateTime};

    fn at(id: &str, user: &str, minutes: i64) -> Event {
        let base: OffsetDateTime = datetime!(2023-01-01 00:00 UTC);
        Event {
            id: EventId::from(id),
            user: user.to_string(),
            source_address: "127.0.0.1".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            timestamp: base + Duration::minutes(minutes),
        }
    }

    fn ids(chunk: &Chunk) -> Vec<&str> {
        chunk.events().iter().map(|e| e.id.0.as_str()).collect()
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert_eq!(group_chunks(Vec::<Event>::new()).count(), 0);
    }

    #[test]
    fn groups_contiguous_users_and_sorts_each_chunk() {
        let events = vec![
            at("a2", "alice", 30),
            at("a1", "alice", 10),
            at("b1", "bob", 5),
            at("c3", "carol", 90),
            at("c1", "carol", 0),
            at("c2", "carol", 45),
        ];
        let chunks: Vec<Chunk> = group_chunks(events).collect();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].user(), "alice");
        assert_eq!(ids(&chunks[0]), vec!["a1", "a2"]);
        assert_eq!(chunks[1].user(), "bob");
        assert_eq!(ids(&chunks[1]), vec!["b1"]);
        assert_eq!(chunks[2].user(), "carol");
        assert_eq!(ids(&chunks[2]), vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn last_user_is_flushed() {
        let chunks: Vec<Chunk> = group_chunks(vec![at("z1", "zed", 0), at("z2", "zed", 1)]).collect();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), 2);
    }

    #[test]
    fn chunks_partition_the_input() {
        let events: Vec<Event> = ["ann", "ann", "ben", "cat", "cat", "cat", "dan"]
            .iter()
            .enumerate()
            .map(|(i, user)| at(&format!("e{i}"), user, 100 - i as i64))
            .collect();
        let mut expected: Vec<String> = events.iter().map(|e| e.id.0.clone()).collect();

        let chunks: Vec<Chunk> = group_chunks(events).collect();
        let mut seen_users: Vec<&str> = chunks.iter().map(Chunk::user).collect();
        seen_users.dedup();
        assert_eq!(seen_users.len(), chunks.len());

        let mut actual: Vec<String> = chunks
            .iter()
            .flat_map(|c| c.events().iter().map(|e| e.id.0.clone()))
            .collect();
        actual.sort();
        expected.sort();
        assert_eq!(actual, expected);

        for chunk in &chunks {
            assert!(chunk
                .events()
                .windows(2)
                .all(|pair| pair[0].timestamp <= pair[1].timestamp));
            let resorted = Chunk::new(chunk.user().to_string(), chunk.events().to_vec());
            assert_eq!(&resorted, chunk);
        }
    }

    #[test]
    fn equal_timestamps_keep_source_order() {
        let chunks: Vec<Chunk> =
            group_chunks(vec![at("x", "amy", 5), at("y", "amy", 5), at("w", "amy", 1)]).collect();
        assert_eq!(ids(&chunks[0]), vec!["w", "x", "y"]);
    }

    #[test]
    fn counts_users_out_of_order() {
        let mut grouper = ChunkGrouper::new(
            vec![at("1", "bob", 0), at("2", "alice", 0), at("3", "bob", 0)].into_iter(),
        );
        let chunks: Vec<Chunk> = grouper.by_ref().collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(grouper.order_violations(), 1);
    }

    #[test]
    fn grouper_is_fused_after_exhaustion() {
        let mut grouper = group_chunks(vec![at("1", "amy", 0)]);
        assert!(grouper.next().is_some());
        assert!(grouper.next().is_none());
        assert!(grouper.next().is_none());
    }
}
