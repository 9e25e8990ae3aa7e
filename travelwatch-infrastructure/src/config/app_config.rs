use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::{info, warn};

use travelwatch_domain::{DbConfig, ScanSettings, ZeroElapsedPolicy, DEFAULT_SPEED_THRESHOLD_KMH};

use crate::config::validate_table_name;

pub const CONFIG_PATH_ENV: &str = "TRAVELWATCH_CONFIG";

/// Where [`AppConfig::load`] took its values from. Reported through
/// [`ConfigOrigin::log`] once a subscriber is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    File(PathBuf),
    /// No file at this path; built-in defaults were used.
    Defaults(PathBuf),
}

impl ConfigOrigin {
    pub fn log(&self) {
        match self {
            ConfigOrigin::File(path) => info!(path = %path.display(), "config file loaded"),
            ConfigOrigin::Defaults(path) => {
                warn!(path = %path.display(), "config file not found, using defaults")
            }
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    pub events_table: String,
    pub anomalies_table: String,
    pub fetch_block_size: u64,
    pub scan_interval_seconds: u64,
    pub speed_threshold_kmh: f64,
    pub zero_elapsed_policy: String,
    pub log_format: String,
    pub log_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            clickhouse_url: "http://127.0.0.1:8123".to_string(),
            clickhouse_database: "logs_db".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            events_table: "logs".to_string(),
            anomalies_table: "anomalies".to_string(),
            fetch_block_size: 100,
            scan_interval_seconds: 60,
            speed_threshold_kmh: DEFAULT_SPEED_THRESHOLD_KMH,
            zero_elapsed_policy: ZeroElapsedPolicy::Flag.as_str().to_string(),
            log_format: "text".to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<(Self, ConfigOrigin)> {
        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "./config.toml".to_string());
        let (mut config, origin) = Self::read_file(Path::new(&path)).await?;
        config.apply_env_overrides();
        config.normalize();
        config.validate()?;
        Ok((config, origin))
    }

    async fn read_file(path: &Path) -> Result<(Self, ConfigOrigin)> {
        if !path.exists() {
            return Ok((AppConfig::default(), ConfigOrigin::Defaults(path.to_path_buf())));
        }
        let content = fs::read_to_string(path).await?;
        let config = toml::from_str(&content)?;
        Ok((config, ConfigOrigin::File(path.to_path_buf())))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: AppConfig = toml::from_str(content)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(user) = &self.clickhouse_user {
            if user.trim().is_empty() {
                self.clickhouse_user = None;
            }
        }
        if let Some(password) = &self.clickhouse_password {
            if password.trim().is_empty() {
                self.clickhouse_password = None;
            }
        }
        if let Some(dir) = &self.log_dir {
            if dir.trim().is_empty() {
                self.log_dir = None;
            }
        }
        self.events_table = self.events_table.trim().to_string();
        self.anomalies_table = self.anomalies_table.trim().to_string();
        self.zero_elapsed_policy = self.zero_elapsed_policy.trim().to_lowercase();
        self.log_format = self.log_format.trim().to_lowercase();
    }

    pub fn validate(&self) -> Result<()> {
        if self.clickhouse_url.trim().is_empty() {
            return Err(anyhow!("clickhouse_url must not be empty"));
        }
        validate_table_name("events_table", &self.events_table)?;
        validate_table_name("anomalies_table", &self.anomalies_table)?;
        if self.fetch_block_size == 0 {
            return Err(anyhow!("fetch_block_size must be greater than 0"));
        }
        if self.scan_interval_seconds == 0 {
            return Err(anyhow!("scan_interval_seconds must be greater than 0"));
        }
        if !self.speed_threshold_kmh.is_finite() || self.speed_threshold_kmh <= 0.0 {
            return Err(anyhow!(
                "speed_threshold_kmh must be a positive number, got {}",
                self.speed_threshold_kmh
            ));
        }
        if ZeroElapsedPolicy::parse(&self.zero_elapsed_policy).is_none() {
            return Err(anyhow!(
                "zero_elapsed_policy must be \"flag\" or \"skip\", got {:?}",
                self.zero_elapsed_policy
            ));
        }
        if !matches!(self.log_format.as_str(), "text" | "json") {
            return Err(anyhow!(
                "log_format must be \"text\" or \"json\", got {:?}",
                self.log_format
            ));
        }
        Ok(())
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_seconds)
    }

    pub fn to_scan_settings(&self) -> ScanSettings {
        ScanSettings {
            speed_threshold_kmh: self.speed_threshold_kmh,
            zero_elapsed_policy: ZeroElapsedPolicy::parse(&self.zero_elapsed_policy)
                .unwrap_or_default(),
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
            events_table: self.events_table.clone(),
            anomalies_table: self.anomalies_table.clone(),
            fetch_block_size: self.fetch_block_size,
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("TRAVELWATCH_CLICKHOUSE_URL") {
            self.clickhouse_url = value;
        }
        if let Some(value) = lookup("TRAVELWATCH_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Some(value) = lookup("TRAVELWATCH_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Some(value) = lookup("TRAVELWATCH_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
        if let Some(value) = lookup("TRAVELWATCH_EVENTS_TABLE") {
            self.events_table = value;
        }
        if let Some(value) = lookup("TRAVELWATCH_ANOMALIES_TABLE") {
            self.anomalies_table = value;
        }
        if let Some(value) = lookup("TRAVELWATCH_FETCH_BLOCK_SIZE") {
            self.fetch_block_size = value.parse().unwrap_or(self.fetch_block_size);
        }
        if let Some(value) = lookup("TRAVELWATCH_SCAN_INTERVAL_SECONDS") {
            self.scan_interval_seconds = value.parse().unwrap_or(self.scan_interval_seconds);
        }
        if let Some(value) = lookup("TRAVELWATCH_SPEED_THRESHOLD_KMH") {
            self.speed_threshold_kmh = value.parse().unwrap_or(self.speed_threshold_kmh);
        }
        if let Some(value) = lookup("TRAVELWATCH_ZERO_ELAPSED_POLICY") {
            self.zero_elapsed_policy = value;
        }
        if let Some(value) = lookup("TRAVELWATCH_LOG_FORMAT") {
            self.log_format = value;
        }
        if let Some(value) = lookup("TRAVELWATCH_LOG_DIR") {
            self.log_dir = Some(value);
        }
    }
}
