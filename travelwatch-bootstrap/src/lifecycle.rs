use anyhow::Result;
use tracing::{info, warn};

use travelwatch_application::queries::anomaly_queries;
use travelwatch_application::ScanScheduler;
use travelwatch_infrastructure::AppConfig;

use crate::context::AppContext;

/// Scans on the configured interval until SIGINT or SIGTERM. A pass in
/// flight stops at its next chunk boundary.
pub async fn run_standalone(config: AppConfig) -> Result<()> {
    let context = AppContext::new(config);
    let scheduler = ScanScheduler::new(context.state);
    let handle = scheduler.spawn(context.config.scan_interval());

    shutdown_signal().await;
    info!("shutdown signal received");
    handle.stop().await;
    Ok(())
}

pub async fn scan_once(config: AppConfig) -> Result<()> {
    let context = AppContext::new(config);
    let report = ScanScheduler::new(context.state).tick().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub async fn print_anomalies(config: AppConfig) -> Result<()> {
    let context = AppContext::new(config);
    let anomalies = anomaly_queries::list_anomalies(&context.state).await?;
    let index = anomaly_queries::anomaly_index(&anomalies);
    println!("{}", serde_json::to_string_pretty(&index)?);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for ctrl-c: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
