// Flags events that imply travel faster than the plausibility threshold.

use serde::Serialize;

use crate::entities::{AnomalyCandidate, Chunk, Event, ScanSettings};
use crate::services::geo::distance_km;
use crate::value_objects::ZeroElapsedPolicy;

const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub pairs: u64,
    /// Pairs with zero elapsed time, resolved by [`ZeroElapsedPolicy`].
    pub degenerate_pairs: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnomalyScanner {
    settings: ScanSettings,
}

impl AnomalyScanner {
    pub fn new(settings: ScanSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ScanSettings {
        &self.settings
    }

    /// Compares each event with its predecessor and flags the later one when
    /// the implied speed exceeds the threshold.
    pub fn scan(&self, chunk: &Chunk, stats: &mut ScanStats) -> Vec<AnomalyCandidate> {
        let mut candidates = Vec::new();
        for pair in chunk.events().windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            stats.pairs += 1;
            let flagged = match travel_speed_kmh(prev, next) {
                Some(speed) => speed > self.settings.speed_threshold_kmh,
                None => {
                    stats.degenerate_pairs += 1;
                    self.settings.zero_elapsed_policy == ZeroElapsedPolicy::Flag
                }
            };
            if flagged {
                candidates.push(AnomalyCandidate::for_event(next));
            }
        }
        candidates
    }
}

/// Speed in km/h needed to get from `prev` to `next`, or `None` when no time
/// elapsed between them.
pub fn travel_speed_kmh(prev: &Event, next: &Event) -> Option<f64> {
    let elapsed_hours = (next.timestamp - prev.timestamp).as_seconds_f64() / SECONDS_PER_HOUR;
    if elapsed_hours <= 0.0 {
        return None;
    }
    let distance = distance_km(prev.latitude, prev.longitude, next.latitude, next.longitude);
    Some(distance / elapsed_hours)
}
