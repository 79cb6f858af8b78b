mod check_result;
mod config;
mod product;
mod tracking;

pub use check_result::CheckResult;
pub use config::{AlertPolicy, TrackerConfig};
pub use product::Product;
pub use tracking::{HistoryEntry, TrackingRecord};

use std::collections::HashMap;

/// Tracking map persisted under a single storage key (product id -> record)
pub type TrackingMap = HashMap<String, TrackingRecord>;
