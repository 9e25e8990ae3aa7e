use async_trait::async_trait;

use crate::entities::{AnomalyCandidate, Event, PersistedAnomaly};

/// Single-pass cursor over events, ascending by user.
#[async_trait]
pub trait EventCursor: Send {
    async fn next_event(&mut self) -> anyhow::Result<Option<Event>>;
}

#[async_trait]
pub trait EventSource: Send + Sync {
    /// Events must come back ordered by `user` ascending. Order within a
    /// user is not required.
    async fn open_cursor(&self) -> anyhow::Result<Box<dyn EventCursor>>;
}

#[async_trait]
pub trait AnomalySink: Send + Sync {
    async fn read_all_persisted(&self) -> anyhow::Result<Vec<PersistedAnomaly>>;
    /// The only mutation point for persisted anomalies.
    async fn append(&self, candidates: &[AnomalyCandidate]) -> anyhow::Result<()>;
}
