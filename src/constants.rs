//! Engine-wide constants
//!
//! Storage keys, timing defaults and the currency tables used by the
//! price parser. Timing values are milliseconds unless the name says
//! otherwise.

/// Storage key for the saved product list
pub const PRODUCTS_KEY: &str = "products";

/// Storage key for the tracking map (product id -> TrackingRecord)
pub const TRACKING_KEY: &str = "tracking";

/// Default recheck period between cycles, in minutes (24h)
pub const DEFAULT_CHECK_PERIOD_MINUTES: u64 = 1440;

/// Wait after opening a page before requesting the price text,
/// so client-side rendering can finish
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 3000;

/// Upper bound on a single extraction request
pub const DEFAULT_EXTRACTION_TIMEOUT_MS: u64 = 10_000;

/// Pause between consecutive product checks within a cycle,
/// bounding request rate against target sites
pub const DEFAULT_PACING_DELAY_MS: u64 = 2000;

/// Bound on per-product history length (oldest entries evicted first)
///
/// Observed deployments ran with either 10 or 30; both remain reachable
/// through `TrackerConfig.max_history`.
pub const DEFAULT_MAX_HISTORY: usize = 30;

/// Compact history bound used by low-storage deployments
pub const COMPACT_MAX_HISTORY: usize = 10;

/// Price changes at or below this absolute amount are treated as noise
pub const PRICE_NOISE_DEADBAND: f64 = 0.01;

/// Default percentage threshold for the significance classifier
pub const DEFAULT_SIGNIFICANCE_THRESHOLD_PCT: f64 = 5.0;

/// Multi-character currency prefixes, stripped before symbol stripping
///
/// Country-code prefixes appear glued to a symbol ("CA$1,299.99") or to
/// the amount itself. Longest-match-first order matters: "CA$" must be
/// removed before the bare "$" pass sees it.
pub const CURRENCY_PREFIXES: &[&str] = &[
    "CA$", "US$", "AU$", "NZ$", "HK$", "SG$", "MX$", "R$", "C$", "A$",
    "USD", "EUR", "GBP", "CAD", "AUD", "JPY", "INR", "VND",
];

/// Single-character currency symbols recognized anywhere in the text
pub const CURRENCY_SYMBOL_CHARS: &[char] = &['$', '€', '£', '¥', '₹', '₫', '₩'];
