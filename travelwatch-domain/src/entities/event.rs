// Event entity
// One geolocation log record for a user at an instant

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

use crate::value_objects::EventId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub user: String,
    /// Carried through untouched.
    pub source_address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Reason an event is excluded from its chunk.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EventRejection {
    #[error("coordinate is not a finite number")]
    NonFiniteCoordinate,
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("timestamp {0} is unset or before the unix epoch")]
    UnsetTimestamp(OffsetDateTime),
}

impl Event {
    pub fn validate(&self) -> Result<(), EventRejection> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(EventRejection::NonFiniteCoordinate);
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(EventRejection::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(EventRejection::LongitudeOutOfRange(self.longitude));
        }
        // ClickHouse stores an unset DateTime as epoch zero.
        if self.timestamp.unix_timestamp() <= 0 {
            return Err(EventRejection::UnsetTimestamp(self.timestamp));
        }
        Ok(())
    }
}
