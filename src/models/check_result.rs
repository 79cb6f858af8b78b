use chrono::{DateTime, Utc};

/// Outcome of checking one product in one cycle
///
/// Ephemeral: produced per product per cycle, consumed by the coordinator
/// and the alert policy, never persisted.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub product_id: String,
    pub success: bool,

    /// Price known before this check
    pub original_price: f64,

    /// Price observed by this check (0.0 when unparseable)
    pub current_price: f64,

    pub changed: bool,
    pub dropped: bool,

    /// Absolute difference between original and current
    pub difference: f64,

    pub check_date: DateTime<Utc>,

    /// Set when `success` is false
    pub error: Option<String>,
}

impl CheckResult {
    /// Result for a check that failed before a price could be observed
    pub fn failure(product_id: String, original_price: f64, error: String) -> Self {
        Self {
            product_id,
            success: false,
            original_price,
            current_price: 0.0,
            changed: false,
            dropped: false,
            difference: 0.0,
            check_date: Utc::now(),
            error: Some(error),
        }
    }
}
