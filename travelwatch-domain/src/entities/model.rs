use serde::{Deserialize, Serialize};

use crate::value_objects::ZeroElapsedPolicy;

/// Cruise speed of a commercial aircraft; anything faster is not travel.
pub const DEFAULT_SPEED_THRESHOLD_KMH: f64 = 926.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanSettings {
    pub speed_threshold_kmh: f64,
    pub zero_elapsed_policy: ZeroElapsedPolicy,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            speed_threshold_kmh: DEFAULT_SPEED_THRESHOLD_KMH,
            zero_elapsed_policy: ZeroElapsedPolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    pub events_table: String,
    pub anomalies_table: String,
    pub fetch_block_size: u64,
}
