use std::sync::Arc;

use travelwatch_domain::ports::{AnomalySink, EventSource};
use travelwatch_domain::ScanSettings;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub settings: ScanSettings,
    pub source: Arc<dyn EventSource>,
    pub sink: Arc<dyn AnomalySink>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(
        settings: ScanSettings,
        source: Arc<dyn EventSource>,
        sink: Arc<dyn AnomalySink>,
    ) -> Self {
        Self {
            settings,
            source,
            sink,
            metrics: Arc::new(Metrics::default()),
        }
    }
}
