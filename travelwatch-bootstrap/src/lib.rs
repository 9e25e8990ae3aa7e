pub mod context;
pub mod lifecycle;
pub mod logging;

pub use lifecycle::{print_anomalies, run_standalone, scan_once};
