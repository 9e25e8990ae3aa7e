// Periodic driver of scan passes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::commands::scan_commands::run_scan_pass;
use crate::{AppState, PassReport, ScanError};

/// Shortest period `spawn` accepts; shorter ones are raised to it.
pub const MIN_SCAN_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Scanning,
}

/// Runs one pass at a time. A failed pass is logged and the scheduler goes
/// back to `Idle`; the next tick tries again.
pub struct ScanScheduler {
    app: AppState,
    state: RwLock<SchedulerState>,
    passes: AtomicU64,
    shutdown_tx: watch::Sender<bool>,
}

impl ScanScheduler {
    pub fn new(app: AppState) -> Arc<Self> {
        let (shutdown_tx, _) = watch::channel(false);
        Arc::new(Self {
            app,
            state: RwLock::new(SchedulerState::Idle),
            passes: AtomicU64::new(0),
            shutdown_tx,
        })
    }

    pub async fn state(&self) -> SchedulerState {
        *self.state.read().await
    }

    pub fn app(&self) -> &AppState {
        &self.app
    }

    /// Runs a pass immediately.
    pub async fn tick(&self) -> Result<PassReport, ScanError> {
        let pass = self.passes.fetch_add(1, Ordering::Relaxed) + 1;
        *self.state.write().await = SchedulerState::Scanning;

        let cancel = self.shutdown_tx.subscribe();
        let result = run_scan_pass(&self.app, &cancel).await;

        *self.state.write().await = SchedulerState::Idle;

        match &result {
            Ok(report) => {
                self.app.metrics.record_pass(report);
                info!(
                    pass,
                    events = report.events_read,
                    rejected = report.events_rejected,
                    chunks = report.chunks,
                    pairs = report.pairs,
                    candidates = report.candidates,
                    degenerate = report.degenerate_pairs,
                    inserted = report.inserted.len(),
                    cancelled = report.cancelled,
                    "{} anomalies were inserted",
                    report.inserted.len()
                );
            }
            Err(err) => {
                self.app.metrics.record_pass_failure();
                error!(pass, error = %err, "scan pass failed");
            }
        }
        debug!(pass, metrics = ?self.app.metrics.snapshot(), "scan metrics");
        result
    }

    /// Asks a running pass to stop at the next chunk boundary and the timer
    /// task to exit.
    pub fn stop(&self) {
        self.shutdown_tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    /// Starts the timer-driven task. The first pass runs right away.
    pub fn spawn(self: &Arc<Self>, period: Duration) -> SchedulerHandle {
        let period = if period < MIN_SCAN_INTERVAL {
            warn!(
                requested_ms = period.as_millis() as u64,
                "scan interval too short, using {}s",
                MIN_SCAN_INTERVAL.as_secs()
            );
            MIN_SCAN_INTERVAL
        } else {
            period
        };
        let (trigger_tx, mut trigger_rx) = mpsc::channel::<()>(4);
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let scheduler = Arc::clone(self);

        let worker = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(interval_secs = period.as_secs(), "scan scheduler started");

            loop {
                if *shutdown_rx.borrow() {
                    break;
                }
                tokio::select! {
                    _ = ticker.tick() => {
                        let _ = scheduler.tick().await;
                    }
                    Some(()) = trigger_rx.recv() => {
                        let _ = scheduler.tick().await;
                    }
                    _ = shutdown_rx.changed() => {}
                }
            }

            info!("scan scheduler stopped");
        });

        SchedulerHandle {
            scheduler: Arc::clone(self),
            trigger_tx,
            worker: Some(worker),
        }
    }
}

pub struct SchedulerHandle {
    scheduler: Arc<ScanScheduler>,
    trigger_tx: mpsc::Sender<()>,
    worker: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Queues a pass outside the regular interval.
    pub async fn trigger(&self) {
        let _ = self.trigger_tx.send(()).await;
    }

    pub fn scheduler(&self) -> &Arc<ScanScheduler> {
        &self.scheduler
    }

    pub async fn stop(mut self) {
        self.scheduler.stop();
        if let Some(worker) = self.worker.take() {
            if let Err(err) = worker.await {
                error!("scan scheduler task failed: {}", err);
            }
        }
    }
}
