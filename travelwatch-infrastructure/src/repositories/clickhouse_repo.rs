use anyhow::{Context, Result};
use async_trait::async_trait;
use clickhouse::query::RowCursor;
use clickhouse::{Client, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use travelwatch_domain::ports::{AnomalySink, EventCursor, EventSource};
use travelwatch_domain::{AnomalyCandidate, AnomalyId, DbConfig, Event, EventId, PersistedAnomaly};

/// `logs` row: `id UUID, username String, ip String, latitude Float32,
/// longitude Float32, datetime DateTime('Etc/GMT')`.
#[derive(Debug, Clone, Deserialize, Row)]
pub struct LogRow {
    #[serde(with = "clickhouse::serde::uuid")]
    pub id: Uuid,
    pub username: String,
    pub ip: String,
    pub latitude: f32,
    pub longitude: f32,
    #[serde(with = "clickhouse::serde::time::datetime")]
    pub datetime: OffsetDateTime,
}

impl From<LogRow> for Event {
    fn from(row: LogRow) -> Self {
        Event {
            id: EventId::from(row.id),
            user: row.username,
            source_address: row.ip,
            latitude: f64::from(row.latitude),
            longitude: f64::from(row.longitude),
            timestamp: row.datetime,
        }
    }
}

/// `anomalies` row: `id UUID, user_id UUID, username String`. `user_id`
/// holds the id of the flagged log row.
#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct AnomalyRecordRow {
    #[serde(with = "clickhouse::serde::uuid")]
    pub id: Uuid,
    #[serde(with = "clickhouse::serde::uuid")]
    pub user_id: Uuid,
    pub username: String,
}

impl AnomalyRecordRow {
    fn from_candidate(candidate: &AnomalyCandidate) -> Result<Self> {
        Ok(Self {
            id: Uuid::parse_str(&candidate.generated_id.0)
                .with_context(|| format!("anomaly id {} is not a uuid", candidate.generated_id))?,
            user_id: Uuid::parse_str(&candidate.event_id.0)
                .with_context(|| format!("event id {} is not a uuid", candidate.event_id))?,
            username: candidate.user.clone(),
        })
    }
}

impl From<AnomalyRecordRow> for PersistedAnomaly {
    fn from(row: AnomalyRecordRow) -> Self {
        PersistedAnomaly {
            id: AnomalyId::from(row.id),
            event_id: EventId::from(row.user_id),
            user: row.username,
        }
    }
}

#[derive(Clone)]
pub struct ClickhouseRepo {
    client: Client,
    events_table: String,
    anomalies_table: String,
}

impl ClickhouseRepo {
    pub fn new(client: Client, events_table: String, anomalies_table: String) -> Self {
        Self {
            client,
            events_table,
            anomalies_table,
        }
    }

    pub fn from_config(config: &DbConfig) -> Self {
        let mut client = Client::default()
            .with_url(&config.clickhouse_url)
            .with_database(&config.clickhouse_database)
            .with_option("max_block_size", config.fetch_block_size.to_string());
        if let Some(user) = &config.clickhouse_user {
            client = client.with_user(user);
        }
        if let Some(password) = &config.clickhouse_password {
            client = client.with_password(password);
        }
        Self::new(
            client,
            config.events_table.clone(),
            config.anomalies_table.clone(),
        )
    }

    fn events_query(&self) -> String {
        format!(
            "SELECT id, username, ip, latitude, longitude, datetime FROM {} ORDER BY username ASC",
            self.events_table
        )
    }

    fn anomalies_query(&self) -> String {
        format!(
            "SELECT id, user_id, username FROM {} ORDER BY username ASC",
            self.anomalies_table
        )
    }
}

pub struct ClickhouseEventCursor {
    rows: RowCursor<LogRow>,
}

#[async_trait]
impl EventCursor for ClickhouseEventCursor {
    async fn next_event(&mut self) -> Result<Option<Event>> {
        let row = self.rows.next().await?;
        Ok(row.map(Event::from))
    }
}

#[async_trait]
impl EventSource for ClickhouseRepo {
    async fn open_cursor(&self) -> Result<Box<dyn EventCursor>> {
        let rows = self
            .client
            .query(&self.events_query())
            .fetch::<LogRow>()
            .with_context(|| format!("failed to query {}", self.events_table))?;
        Ok(Box::new(ClickhouseEventCursor { rows }))
    }
}

#[async_trait]
impl AnomalySink for ClickhouseRepo {
    async fn read_all_persisted(&self) -> Result<Vec<PersistedAnomaly>> {
        let rows = self
            .client
            .query(&self.anomalies_query())
            .fetch_all::<AnomalyRecordRow>()
            .await
            .with_context(|| format!("failed to read {}", self.anomalies_table))?;
        Ok(rows.into_iter().map(PersistedAnomaly::from).collect())
    }

    async fn append(&self, candidates: &[AnomalyCandidate]) -> Result<()> {
        let rows = candidates
            .iter()
            .map(AnomalyRecordRow::from_candidate)
            .collect::<Result<Vec<_>>>()?;
        let mut insert = self.client.insert(&self.anomalies_table)?;
        for row in &rows {
            insert.write(row).await?;
        }
        insert.end().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn repo() -> ClickhouseRepo {
        ClickhouseRepo::new(Client::default(), "logs".to_string(), "anomalies".to_string())
    }

    #[test]
    fn queries_order_events_by_user() {
        let repo = repo();
        assert_eq!(
            repo.events_query(),
            "SELECT id, username, ip, latitude, longitude, datetime FROM logs ORDER BY username ASC"
        );
        assert!(repo.anomalies_query().starts_with("SELECT id, user_id, username FROM anomalies"));
    }

    #[test]
    fn log_row_maps_to_event() {
        let id = Uuid::new_v4();
        let event = Event::from(LogRow {
            id,
            username: "Mateo_Garcia".to_string(),
            ip: "10.1.2.3".to_string(),
            latitude: 48.5,
            longitude: -3.25,
            datetime: datetime!(2023-01-20 10:15:00 UTC),
        });
        assert_eq!(event.id, EventId::from(id));
        assert_eq!(event.user, "Mateo_Garcia");
        assert_eq!(event.source_address, "10.1.2.3");
        assert_eq!(event.latitude, 48.5);
        assert_eq!(event.longitude, -3.25);
    }

    #[test]
    fn candidate_row_keeps_flagged_event_in_user_id() {
        let event_id = Uuid::new_v4();
        let candidate = AnomalyCandidate {
            generated_id: AnomalyId::generate(),
            event_id: EventId::from(event_id),
            user: "Daniel_Martin".to_string(),
        };
        let row = AnomalyRecordRow::from_candidate(&candidate).expect("row");
        assert_eq!(row.user_id, event_id);

        let persisted = PersistedAnomaly::from(row);
        assert_eq!(persisted.event_id, candidate.event_id);
        assert_eq!(persisted.id, candidate.generated_id);
    }

    #[test]
    fn non_uuid_event_ids_are_rejected() {
        let candidate = AnomalyCandidate {
            generated_id: AnomalyId::generate(),
            event_id: EventId::from("not-a-uuid"),
            user: "Daniel_Martin".to_string(),
        };
        assert!(AnomalyRecordRow::from_candidate(&candidate).is_err());
    }
}
