//! Price change classification
//!
//! Compares two consecutive numeric observations of the same product.
//! A zero on either side means the underlying text was unparseable, so
//! no conclusion is drawn from it.

use crate::constants::{DEFAULT_SIGNIFICANCE_THRESHOLD_PCT, PRICE_NOISE_DEADBAND};

/// Relationship between two consecutive price observations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceComparison {
    pub changed: bool,
    pub dropped: bool,
    pub difference: f64,
}

/// Classify `current` against `previous`.
///
/// Differences at or below the sub-cent deadband are treated as
/// unchanged. `dropped` is only set when the change is genuine.
pub fn compare(previous: f64, current: f64) -> PriceComparison {
    if previous == 0.0 || current == 0.0 {
        return PriceComparison {
            changed: false,
            dropped: false,
            difference: 0.0,
        };
    }

    let difference = (previous - current).abs();
    let changed = difference > PRICE_NOISE_DEADBAND;
    let dropped = changed && previous > current;

    PriceComparison {
        changed,
        dropped,
        difference,
    }
}

/// Percentage-based significance report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Significance {
    pub percentage_change: f64,
    pub is_significant: bool,
}

/// Classify the relative size of a change against a percentage threshold.
///
/// Threshold values at or below zero fall back to the 5% default. An
/// unparseable previous price reports no significance.
pub fn significance(previous: f64, current: f64, threshold_pct: f64) -> Significance {
    let threshold = if threshold_pct > 0.0 {
        threshold_pct
    } else {
        DEFAULT_SIGNIFICANCE_THRESHOLD_PCT
    };

    if previous == 0.0 {
        return Significance {
            percentage_change: 0.0,
            is_significant: false,
        };
    }

    let percentage_change = (current - previous) / previous * 100.0;

    Significance {
        percentage_change,
        is_significant: percentage_change.abs() >= threshold,
    }
}
