use std::sync::Arc;

use tracing::info;

use travelwatch_application::AppState;
use travelwatch_infrastructure::{AppConfig, ClickhouseRepo};

pub struct AppContext {
    pub config: AppConfig,
    pub state: AppState,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        let db_config = config.to_db_config();
        let settings = config.to_scan_settings();
        info!(
            clickhouse_url = %db_config.clickhouse_url,
            clickhouse_database = %db_config.clickhouse_database,
            clickhouse_user = %db_config
                .clickhouse_user
                .as_deref()
                .unwrap_or("<none>"),
            clickhouse_password_set = db_config.clickhouse_password.is_some(),
            events_table = %db_config.events_table,
            anomalies_table = %db_config.anomalies_table,
            speed_threshold_kmh = settings.speed_threshold_kmh,
            zero_elapsed_policy = settings.zero_elapsed_policy.as_str(),
            "config loaded"
        );

        let repo = Arc::new(ClickhouseRepo::from_config(&db_config));
        let state = AppState::new(settings, repo.clone(), repo);

        Self { config, state }
    }
}
