use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::PassReport;

#[derive(Debug, Default)]
pub struct Metrics {
    passes_completed: AtomicU64,
    passes_failed: AtomicU64,
    events_read: AtomicU64,
    events_rejected: AtomicU64,
    candidates: AtomicU64,
    anomalies_inserted: AtomicU64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub passes_completed: u64,
    pub passes_failed: u64,
    pub events_read: u64,
    pub events_rejected: u64,
    pub candidates: u64,
    pub anomalies_inserted: u64,
}

impl Metrics {
    pub fn record_pass(&self, report: &PassReport) {
        self.passes_completed.fetch_add(1, Ordering::Relaxed);
        self.events_read
            .fetch_add(report.events_read, Ordering::Relaxed);
        self.events_rejected
            .fetch_add(report.events_rejected, Ordering::Relaxed);
        self.candidates
            .fetch_add(report.candidates, Ordering::Relaxed);
        self.anomalies_inserted
            .fetch_add(report.inserted.len() as u64, Ordering::Relaxed);
    }

    pub fn record_pass_failure(&self) {
        self.passes_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            passes_completed: self.passes_completed.load(Ordering::Relaxed),
            passes_failed: self.passes_failed.load(Ordering::Relaxed),
            events_read: self.events_read.load(Ordering::Relaxed),
            events_rejected: self.events_rejected.load(Ordering::Relaxed),
            candidates: self.candidates.load(Ordering::Relaxed),
            anomalies_inserted: self.anomalies_inserted.load(Ordering::Relaxed),
        }
    }
}
