use crate::constants::{
    DEFAULT_CHECK_PERIOD_MINUTES, DEFAULT_EXTRACTION_TIMEOUT_MS, DEFAULT_MAX_HISTORY,
    DEFAULT_PACING_DELAY_MS, DEFAULT_SETTLE_DELAY_MS,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which check outcomes raise an alert
///
/// Two deployments of the original system disagreed on this: one alerted
/// only on genuine price drops, the other when the price held steady
/// across checks. Both behaviors are kept selectable; they are never
/// merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertPolicy {
    /// Alert when a check observes a price decrease
    PriceDrop,
    /// Alert when a successful check observes no change
    SamePrice,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        AlertPolicy::PriceDrop
    }
}

impl std::str::FromStr for AlertPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price-drop" | "drop" => Ok(AlertPolicy::PriceDrop),
            "same-price" | "same" => Ok(AlertPolicy::SamePrice),
            other => Err(format!("unknown alert policy: {}", other)),
        }
    }
}

/// Engine configuration
///
/// Defaults match the canonical deployment (24h recheck, drop alerts,
/// 30-entry history). Every value can be overridden at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Minutes between scheduled cycles
    pub check_period_minutes: u64,

    /// Wait after opening a page before requesting the price text
    pub settle_delay_ms: u64,

    /// Upper bound on one extraction request
    pub extraction_timeout_ms: u64,

    /// Pause between consecutive product checks
    pub pacing_delay_ms: u64,

    /// Bound on per-product history length
    pub max_history: usize,

    pub alert_policy: AlertPolicy,

    /// When set, drop alerts additionally require the percentage change
    /// to reach this threshold
    pub significance_threshold_pct: Option<f64>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            check_period_minutes: DEFAULT_CHECK_PERIOD_MINUTES,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            extraction_timeout_ms: DEFAULT_EXTRACTION_TIMEOUT_MS,
            pacing_delay_ms: DEFAULT_PACING_DELAY_MS,
            max_history: DEFAULT_MAX_HISTORY,
            alert_policy: AlertPolicy::default(),
            significance_threshold_pct: None,
        }
    }
}

impl TrackerConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_millis(self.extraction_timeout_ms)
    }

    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }
}
