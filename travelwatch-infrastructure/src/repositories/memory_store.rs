use std::vec;

use async_trait::async_trait;
use tokio::sync::RwLock;

use travelwatch_domain::ports::{AnomalySink, EventCursor, EventSource};
use travelwatch_domain::{AnomalyCandidate, Event, PersistedAnomaly};

/// Event log and anomaly table held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<Vec<Event>>,
    anomalies: RwLock<Vec<PersistedAnomaly>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events: RwLock::new(events),
            anomalies: RwLock::default(),
        }
    }

    pub async fn insert_events(&self, events: impl IntoIterator<Item = Event>) {
        self.events.write().await.extend(events);
    }

    pub async fn anomalies(&self) -> Vec<PersistedAnomaly> {
        self.anomalies.read().await.clone()
    }
}

pub struct MemoryCursor {
    events: vec::IntoIter<Event>,
}

#[async_trait]
impl EventCursor for MemoryCursor {
    async fn next_event(&mut self) -> anyhow::Result<Option<Event>> {
        Ok(self.events.next())
    }
}

#[async_trait]
impl EventSource for MemoryStore {
    /// Snapshot of the log at open time, ordered by user.
    async fn open_cursor(&self) -> anyhow::Result<Box<dyn EventCursor>> {
        let mut events = self.events.read().await.clone();
        events.sort_by(|a, b| a.user.cmp(&b.user));
        Ok(Box::new(MemoryCursor {
            events: events.into_iter(),
        }))
    }
}

#[async_trait]
impl AnomalySink for MemoryStore {
    async fn read_all_persisted(&self) -> anyhow::Result<Vec<PersistedAnomaly>> {
        Ok(self.anomalies().await)
    }

    async fn append(&self, candidates: &[AnomalyCandidate]) -> anyhow::Result<()> {
        self.anomalies
            .write()
            .await
            .extend(candidates.iter().cloned().map(PersistedAnomaly::from));
        Ok(())
    }
}
