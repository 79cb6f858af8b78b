//! Alert evaluation and presentation
//!
//! The policy decides whether a CheckResult deserves an alert; how the
//! alert is shown stays behind the Notifier trait. The shipped notifier
//! writes structured log events.

use crate::models::{AlertPolicy, CheckResult, Product, TrackerConfig};
use crate::services::change_detector::significance;
use async_trait::async_trait;
use tracing::info;

/// Alert presentation collaborator
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn present(&self, id: &str, title: &str, message: &str);
}

/// Notifier that emits alerts as log events
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn present(&self, id: &str, title: &str, message: &str) {
        info!(alert_id = id, title = title, message = message, "ALERT");
    }
}

/// Applies the configured AlertPolicy to cycle results
pub struct AlertEvaluator {
    policy: AlertPolicy,
    significance_threshold_pct: Option<f64>,
}

impl AlertEvaluator {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            policy: config.alert_policy,
            significance_threshold_pct: config.significance_threshold_pct,
        }
    }

    pub fn should_alert(&self, result: &CheckResult) -> bool {
        if !result.success {
            return false;
        }

        match self.policy {
            AlertPolicy::PriceDrop => {
                if !(result.changed && result.dropped) {
                    return false;
                }
                match self.significance_threshold_pct {
                    Some(threshold) => {
                        significance(result.original_price, result.current_price, threshold)
                            .is_significant
                    }
                    None => true,
                }
            }
            // Unchanged only counts when a price was actually observed
            AlertPolicy::SamePrice => !result.changed && result.current_price > 0.0,
        }
    }

    /// Title and message for an alert-worthy result.
    pub fn alert_content(&self, product: &Product, result: &CheckResult) -> (String, String) {
        match self.policy {
            AlertPolicy::PriceDrop => (
                format!("Price drop: {}", product.title),
                format!(
                    "{:.2} -> {:.2} (saved {:.2})",
                    result.original_price, result.current_price, result.difference
                ),
            ),
            AlertPolicy::SamePrice => (
                format!("Price unchanged: {}", product.title),
                format!("Still {:.2} since the last check", result.current_price),
            ),
        }
    }
}
