use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use travelwatch_domain::ports::{AnomalySink, EventCursor, EventSource};
use travelwatch_domain::{AnomalyCandidate, Event, EventId, PersistedAnomaly};

const BASE: OffsetDateTime = datetime!(2023-01-15 06:00 UTC);

/// Degrees of longitude along the equator covering `km`.
pub fn equator_degrees(km: f64) -> f64 {
    km / travelwatch_domain::EARTH_RADIUS_KM * 180.0 / std::f64::consts::PI
}

pub fn event_at(id: &str, user: &str, longitude: f64, minutes: i64) -> Event {
    Event {
        id: EventId::from(id),
        user: user.to_string(),
        source_address: "172.16.0.2".to_string(),
        latitude: 0.0,
        longitude,
        timestamp: BASE + Duration::minutes(minutes),
    }
}

pub struct VecCursor {
    events: VecDeque<Event>,
}

impl VecCursor {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events: events.into(),
        }
    }
}

#[async_trait]
impl EventCursor for VecCursor {
    async fn next_event(&mut self) -> anyhow::Result<Option<Event>> {
        Ok(self.events.pop_front())
    }
}

/// Yields the given events, then fails.
pub struct FailingCursor {
    inner: VecCursor,
}

impl FailingCursor {
    pub fn after(events: Vec<Event>) -> Self {
        Self {
            inner: VecCursor::new(events),
        }
    }
}

#[async_trait]
impl EventCursor for FailingCursor {
    async fn next_event(&mut self) -> anyhow::Result<Option<Event>> {
        match self.inner.next_event().await? {
            Some(event) => Ok(Some(event)),
            None => Err(anyhow!("connection reset")),
        }
    }
}

/// Source over a fixed event list; the first `failures` opens fail.
pub struct VecSource {
    events: Mutex<Vec<Event>>,
    failures: AtomicUsize,
    opens: AtomicUsize,
}

impl VecSource {
    pub fn new(events: Vec<Event>) -> Self {
        Self::failing_first(events, 0)
    }

    pub fn failing_first(events: Vec<Event>, failures: usize) -> Self {
        Self {
            events: Mutex::new(events),
            failures: AtomicUsize::new(failures),
            opens: AtomicUsize::new(0),
        }
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventSource for VecSource {
    async fn open_cursor(&self) -> anyhow::Result<Box<dyn EventCursor>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(anyhow!("source offline"));
        }
        let mut events = self.events.lock().expect("events lock").clone();
        events.sort_by(|a, b| a.user.cmp(&b.user));
        Ok(Box::new(VecCursor::new(events)))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    persisted: Mutex<Vec<PersistedAnomaly>>,
    fail_appends: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            persisted: Mutex::new(Vec::new()),
            fail_appends: true,
        }
    }

    pub fn with_persisted(persisted: Vec<PersistedAnomaly>) -> Self {
        Self {
            persisted: Mutex::new(persisted),
            fail_appends: false,
        }
    }

    pub fn persisted(&self) -> Vec<PersistedAnomaly> {
        self.persisted.lock().expect("sink lock").clone()
    }
}

#[async_trait]
impl AnomalySink for RecordingSink {
    async fn read_all_persisted(&self) -> anyhow::Result<Vec<PersistedAnomaly>> {
        Ok(self.persisted())
    }

    async fn append(&self, candidates: &[AnomalyCandidate]) -> anyhow::Result<()> {
        if self.fail_appends {
            return Err(anyhow!("insert rejected"));
        }
        self.persisted
            .lock()
            .expect("sink lock")
            .extend(candidates.iter().cloned().map(PersistedAnomaly::from));
        Ok(())
    }
}
