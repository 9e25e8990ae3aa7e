// Drops candidates whose flagged event is already persisted.

use std::collections::HashSet;

use crate::entities::{AnomalyCandidate, PersistedAnomaly};
use crate::value_objects::EventId;

/// Index of flagged event ids. Dedup is by `event_id` only; the user is not
/// compared.
#[derive(Debug, Default, Clone)]
pub struct AnomalyReconciler {
    known: HashSet<EventId>,
}

impl AnomalyReconciler {
    pub fn from_persisted<'a, I>(persisted: I) -> Self
    where
        I: IntoIterator<Item = &'a PersistedAnomaly>,
    {
        Self {
            known: persisted
                .into_iter()
                .map(|anomaly| anomaly.event_id.clone())
                .collect(),
        }
    }

    pub fn is_known(&self, event_id: &EventId) -> bool {
        self.known.contains(event_id)
    }

    pub fn known_count(&self) -> usize {
        self.known.len()
    }

    /// Keeps candidates for unseen events. Kept ids are recorded, so a second
    /// candidate for the same event in one batch is dropped too.
    pub fn filter_new(&mut self, candidates: Vec<AnomalyCandidate>) -> Vec<AnomalyCandidate> {
        candidates
            .into_iter()
            .filter(|candidate| self.known.insert(candidate.event_id.clone()))
            .collect()
    }
}

pub fn reconcile(
    candidates: Vec<AnomalyCandidate>,
    persisted: &[PersistedAnomaly],
) -> Vec<AnomalyCandidate> {
    AnomalyReconciler::from_persisted(persisted).filter_new(candidates)
}
