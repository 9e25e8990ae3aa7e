use std::collections::BTreeMap;

use tracing::error;

use travelwatch_domain::PersistedAnomaly;

use crate::{AppState, ScanError};

pub async fn list_anomalies(state: &AppState) -> Result<Vec<PersistedAnomaly>, ScanError> {
    state.sink.read_all_persisted().await.map_err(|err| {
        error!("failed to fetch anomalies: {:#}", err);
        ScanError::SinkUnavailable(err)
    })
}

/// Persisted anomalies keyed by anomaly id, each mapped to
/// `(event_id, user)`; serializes as `{"<id>": ["<event_id>", "<user>"]}`.
pub fn anomaly_index(anomalies: &[PersistedAnomaly]) -> BTreeMap<String, (String, String)> {
    anomalies
        .iter()
        .map(|anomaly| {
            (
                anomaly.id.to_string(),
                (anomaly.event_id.to_string(), anomaly.user.clone()),
            )
        })
        .collect()
}
