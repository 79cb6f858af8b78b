use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed price point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Observed numeric price (0.0 when the page text was unparseable)
    pub price: f64,

    /// When the observation was made
    pub timestamp: DateTime<Utc>,

    /// Whether this observation was a drop from the previous one
    pub dropped: bool,
}

impl HistoryEntry {
    pub fn new(price: f64, dropped: bool) -> Self {
        Self {
            price,
            timestamp: Utc::now(),
            dropped,
        }
    }
}

/// Persisted per-product tracking state
///
/// Created on the first check of a product, mutated on every cycle, and
/// removed only when its product is removed. `history` is bounded; the
/// coordinator evicts oldest-first past the configured limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingRecord {
    pub product_id: String,

    /// Last successfully parsed numeric price
    pub last_price: f64,

    /// Non-decreasing across cycles
    pub last_check_time: DateTime<Utc>,

    /// Consecutive successful checks with an unchanged price
    pub same_count: u32,

    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl TrackingRecord {
    pub fn new(product_id: String, last_price: f64) -> Self {
        Self {
            product_id,
            last_price,
            last_check_time: Utc::now(),
            same_count: 0,
            history: Vec::new(),
        }
    }
}
