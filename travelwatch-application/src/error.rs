use thiserror::Error;

/// Failure of a whole scan pass. Never fatal to the process: the scheduler
/// logs it and tries again on the next tick.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("event source unavailable: {0:#}")]
    SourceUnavailable(anyhow::Error),
    #[error("anomaly sink unavailable: {0:#}")]
    SinkUnavailable(anyhow::Error),
}
