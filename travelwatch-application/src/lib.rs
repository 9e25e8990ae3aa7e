// Travelwatch Application Layer

pub mod commands;
pub mod error;
pub mod metrics;
pub mod queries;
pub mod scheduler;
pub mod state;
pub mod stream;

#[cfg(test)]
mod test_support;

pub use commands::scan_commands::PassReport;
pub use error::ScanError;
pub use metrics::{Metrics, MetricsSnapshot};
pub use scheduler::{ScanScheduler, SchedulerHandle, SchedulerState, MIN_SCAN_INTERVAL};
pub use state::AppState;
pub use stream::ChunkStream;
