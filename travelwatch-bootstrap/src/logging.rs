use anyhow::{anyhow, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use travelwatch_infrastructure::AppConfig;

/// Installs the global subscriber. `RUST_LOG` wins over the default `info`.
/// Keep the returned guard alive for as long as file logging should flush.
pub fn init(config: &AppConfig) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = config.log_format == "json";

    let Some(dir) = &config.log_dir else {
        let builder = tracing_subscriber::fmt().with_env_filter(filter);
        let installed = if json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
        installed.map_err(|err| anyhow!("failed to install tracing subscriber: {}", err))?;
        return Ok(None);
    };

    let appender = tracing_appender::rolling::daily(dir, "travelwatch.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| anyhow!("failed to install tracing subscriber: {}", err))?;
    Ok(Some(guard))
}
