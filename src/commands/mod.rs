pub mod add;
pub mod check;
pub mod history;
pub mod prune;
pub mod remove;
pub mod status;
pub mod watch;

use crate::cli::EngineArgs;
use crate::error::Result;
use crate::models::TrackerConfig;
use crate::services::{
    EngineStorage, HttpPageFetcher, JsonFileStore, LogNotifier, TrackingCoordinator,
};
use crate::utils::get_data_dir;
use std::sync::Arc;

/// One JSON document holds both persisted collections
pub fn engine_storage() -> EngineStorage {
    let path = get_data_dir().join("store.json");
    EngineStorage::new(Arc::new(JsonFileStore::new(path)))
}

pub fn tracker_config(engine: &EngineArgs) -> TrackerConfig {
    TrackerConfig {
        check_period_minutes: engine.period,
        alert_policy: engine.alert_policy,
        significance_threshold_pct: engine.significance,
        max_history: engine.max_history,
        ..TrackerConfig::default()
    }
}

pub fn build_coordinator(config: TrackerConfig) -> Result<Arc<TrackingCoordinator>> {
    let storage = engine_storage();
    let fetcher = Arc::new(HttpPageFetcher::new()?);
    let notifier = Arc::new(LogNotifier);
    Ok(Arc::new(TrackingCoordinator::new(
        config, storage, fetcher, notifier,
    )))
}
