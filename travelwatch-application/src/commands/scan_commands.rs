use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use travelwatch_domain::{reconcile, AnomalyCandidate, AnomalyScanner, ScanStats};

use crate::{AppState, ChunkStream, ScanError};

#[derive(Debug, Default, Clone, Serialize)]
pub struct PassReport {
    pub events_read: u64,
    pub events_rejected: u64,
    pub chunks: u64,
    /// Consecutive event pairs compared across all chunks.
    pub pairs: u64,
    pub candidates: u64,
    pub degenerate_pairs: u64,
    pub order_violations: u64,
    pub inserted: Vec<AnomalyCandidate>,
    /// Stopped early at a chunk boundary; completed chunks were still persisted.
    pub cancelled: bool,
}

/// One full pass: read, group, scan, reconcile, persist.
///
/// `cancel` is checked between chunks. Sink failures lose the pass's
/// candidates; the next pass finds them again since nothing was written.
pub async fn run_scan_pass(
    state: &AppState,
    cancel: &watch::Receiver<bool>,
) -> Result<PassReport, ScanError> {
    let cursor = state
        .source
        .open_cursor()
        .await
        .map_err(ScanError::SourceUnavailable)?;
    let mut stream = ChunkStream::new(cursor);
    let scanner = AnomalyScanner::new(state.settings);
    let mut stats = ScanStats::default();
    let mut candidates = Vec::new();
    let mut report = PassReport::default();

    loop {
        if *cancel.borrow() {
            report.cancelled = true;
            break;
        }
        let Some(chunk) = stream
            .next_chunk()
            .await
            .map_err(ScanError::SourceUnavailable)?
        else {
            break;
        };
        report.chunks += 1;
        let found = scanner.scan(&chunk, &mut stats);
        if !found.is_empty() {
            debug!(user = chunk.user(), events = chunk.len(), found = found.len(), "chunk flagged");
        }
        candidates.extend(found);
    }

    report.events_read = stream.events_read();
    report.events_rejected = stream.events_rejected();
    report.order_violations = stream.order_violations();
    report.pairs = stats.pairs;
    report.degenerate_pairs = stats.degenerate_pairs;
    report.candidates = candidates.len() as u64;

    if report.events_rejected > 0 {
        warn!(rejected = report.events_rejected, "malformed events excluded from scan");
    }
    if report.order_violations > 0 {
        warn!(
            violations = report.order_violations,
            "event source returned users out of order; chunks may repeat a user"
        );
    }

    let persisted = state
        .sink
        .read_all_persisted()
        .await
        .map_err(ScanError::SinkUnavailable)?;
    let fresh = reconcile(candidates, &persisted);
    if !fresh.is_empty() {
        state
            .sink
            .append(&fresh)
            .await
            .map_err(ScanError::SinkUnavailable)?;
    }
    report.inserted = fresh;
    Ok(report)
}
