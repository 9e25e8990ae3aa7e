// Anomaly entities
// A candidate is produced by a scan pass; a persisted anomaly is owned by the sink

use serde::{Deserialize, Serialize};

use crate::entities::Event;
use crate::value_objects::{AnomalyId, EventId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyCandidate {
    pub generated_id: AnomalyId,
    /// The later event of the implausible pair.
    pub event_id: EventId,
    pub user: String,
}

impl AnomalyCandidate {
    pub fn for_event(event: &Event) -> Self {
        Self {
            generated_id: AnomalyId::generate(),
            event_id: event.id.clone(),
            user: event.user.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedAnomaly {
    pub id: AnomalyId,
    pub event_id: EventId,
    pub user: String,
}

impl From<AnomalyCandidate> for PersistedAnomaly {
    fn from(candidate: AnomalyCandidate) -> Self {
        Self {
            id: candidate.generated_id,
            event_id: candidate.event_id,
            user: candidate.user,
        }
    }
}
