//! Check-cycle coordination
//!
//! One cycle walks every saved product strictly in sequence: open the
//! page, let it settle, request the price text under a timeout, close
//! the page, classify the change, record history. A single product's
//! failure never aborts the cycle. Storage is read once at the start
//! and written once at the end.

use crate::error::{Error, Result};
use crate::models::{
    CheckResult, HistoryEntry, Product, TrackerConfig, TrackingMap, TrackingRecord,
};
use crate::services::change_detector;
use crate::services::extraction::PageFetcher;
use crate::services::history_store::HistoryStore;
use crate::services::notify::{AlertEvaluator, Notifier};
use crate::services::price_parser;
use crate::services::storage::EngineStorage;
use chrono::Utc;
use std::sync::Arc;
use tokio::time::{sleep, timeout};
use tracing::{error, info, warn};

pub struct TrackingCoordinator {
    config: TrackerConfig,
    storage: EngineStorage,
    fetcher: Arc<dyn PageFetcher>,
    notifier: Arc<dyn Notifier>,
}

impl TrackingCoordinator {
    pub fn new(
        config: TrackerConfig,
        storage: EngineStorage,
        fetcher: Arc<dyn PageFetcher>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            storage,
            fetcher,
            notifier,
        }
    }

    /// Run one full check cycle over all saved products.
    pub async fn run_cycle(&self) -> Vec<CheckResult> {
        let cycle_start = std::time::Instant::now();

        // The product list can be edited between cycles, so it is always
        // read fresh here rather than cached on the coordinator
        let mut products = self.storage.load_products().await;
        if products.is_empty() {
            info!("No tracked products, skipping cycle");
            return Vec::new();
        }

        // One tracking-map read for the whole cycle
        let mut tracking = self.storage.load_tracking().await;

        info!(product_count = products.len(), "Starting check cycle");

        let total = products.len();
        let mut results = Vec::with_capacity(total);

        for (idx, product) in products.iter_mut().enumerate() {
            let result = self.check_product(product, &mut tracking).await;

            match &result.error {
                None => {
                    info!(
                        product_id = %result.product_id,
                        current_price = result.current_price,
                        changed = result.changed,
                        dropped = result.dropped,
                        "Product checked"
                    );
                }
                Some(e) => {
                    warn!(
                        product_id = %result.product_id,
                        error = %e,
                        "Product check failed, continuing cycle"
                    );
                }
            }

            results.push(result);

            if idx + 1 < total {
                sleep(self.config.pacing_delay()).await;
            }
        }

        // Persist once at cycle end; failures are logged, the in-memory
        // results stand either way
        if let Err(e) = self.storage.save_products(&products).await {
            error!(error = %e, "Failed to persist product list");
        }
        if let Err(e) = self.storage.save_tracking(&tracking).await {
            error!(error = %e, "Failed to persist tracking map");
        }

        self.raise_alerts(&products, &results).await;

        info!(
            product_count = total,
            succeeded = results.iter().filter(|r| r.success).count(),
            changed = results.iter().filter(|r| r.changed).count(),
            duration_secs = cycle_start.elapsed().as_secs_f64(),
            "Check cycle completed"
        );

        results
    }

    /// Check a single product and fold the outcome into its record.
    async fn check_product(
        &self,
        product: &mut Product,
        tracking: &mut TrackingMap,
    ) -> CheckResult {
        let previous = tracking
            .get(&product.id)
            .map(|record| record.last_price)
            .filter(|p| *p > 0.0)
            .unwrap_or_else(|| price_parser::parse(&product.price));

        let raw_text = match self.fetch_price_text(&product.url).await {
            Ok(text) => text,
            Err(e) => {
                return CheckResult::failure(product.id.clone(), previous, e.to_string());
            }
        };

        let current = price_parser::parse_opt(raw_text.as_deref());
        let comparison = change_detector::compare(previous, current);
        let now = Utc::now();

        let record = tracking
            .entry(product.id.clone())
            .or_insert_with(|| TrackingRecord::new(product.id.clone(), previous));

        HistoryStore::push_bounded(
            &mut record.history,
            HistoryEntry {
                price: current,
                timestamp: now,
                dropped: comparison.dropped,
            },
            self.config.max_history,
        );

        if current > 0.0 {
            record.last_price = current;
        }
        record.last_check_time = now;
        if comparison.changed {
            record.same_count = 0;
        } else if current > 0.0 {
            record.same_count += 1;
        }

        // Refresh the display text on the product itself when it moved
        if comparison.changed {
            if let Some(text) = &raw_text {
                product.price = text.clone();
            }
        }

        CheckResult {
            product_id: product.id.clone(),
            success: true,
            original_price: previous,
            current_price: current,
            changed: comparison.changed,
            dropped: comparison.dropped,
            difference: comparison.difference,
            check_date: now,
            error: None,
        }
    }

    /// Open, settle, extract under the bound, close unconditionally.
    async fn fetch_price_text(&self, url: &str) -> Result<Option<String>> {
        let page = self.fetcher.open(url).await?;

        sleep(self.config.settle_delay()).await;

        let outcome = timeout(
            self.config.extraction_timeout(),
            self.fetcher.extract(&page),
        )
        .await;

        // Close before inspecting the outcome so the handle never leaks
        self.fetcher.close(page).await;

        match outcome {
            Ok(extracted) => extracted,
            Err(_) => Err(Error::ExtractionTimeout(format!(
                "no price text from {} within {}ms",
                url, self.config.extraction_timeout_ms
            ))),
        }
    }

    async fn raise_alerts(&self, products: &[Product], results: &[CheckResult]) {
        let evaluator = AlertEvaluator::new(&self.config);

        for result in results {
            if !evaluator.should_alert(result) {
                continue;
            }
            let Some(product) = products.iter().find(|p| p.id == result.product_id) else {
                continue;
            };
            let (title, message) = evaluator.alert_content(product, result);
            self.notifier
                .present(&result.product_id, &title, &message)
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::models::AlertPolicy;
    use crate::services::extraction::PageHandle;
    use crate::services::storage::KeyValueStore;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory key-value store
    struct MemoryStore {
        data: Mutex<HashMap<String, Value>>,
    }

    impl MemoryStore {
        fn new() -> Self {
            Self {
                data: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl KeyValueStore for MemoryStore {
        async fn get(&self, key: &str) -> Result<Option<Value>> {
            Ok(self.data.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: Value) -> Result<()> {
            self.data.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }
    }

    /// Scripted page fetcher: url -> price text, error, or no price node
    struct ScriptedFetcher {
        responses: HashMap<String, Option<String>>,
        failing_urls: Vec<String>,
        open_count: AtomicUsize,
        close_count: AtomicUsize,
    }

    impl ScriptedFetcher {
        fn new() -> Self {
            Self {
                responses: HashMap::new(),
                failing_urls: Vec::new(),
                open_count: AtomicUsize::new(0),
                close_count: AtomicUsize::new(0),
            }
        }

        fn with_price(mut self, url: &str, price: &str) -> Self {
            self.responses
                .insert(url.to_string(), Some(price.to_string()));
            self
        }

        fn with_failure(mut self, url: &str) -> Self {
            self.failing_urls.push(url.to_string());
            self
        }

        fn opens(&self) -> usize {
            self.open_count.load(Ordering::SeqCst)
        }

        fn closes(&self) -> usize {
            self.close_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        async fn open(&self, url: &str) -> Result<PageHandle> {
            self.open_count.fetch_add(1, Ordering::SeqCst);
            if self.failing_urls.iter().any(|u| u == url) {
                return Err(Error::Network(format!("connection refused: {}", url)));
            }
            Ok(PageHandle::new(url, ""))
        }

        async fn extract(&self, page: &PageHandle) -> Result<Option<String>> {
            Ok(self.responses.get(&page.url).cloned().flatten())
        }

        async fn close(&self, _page: PageHandle) {
            self.close_count.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Notifier that records every alert
    struct RecordingNotifier {
        alerts: Mutex<Vec<(String, String)>>,
    }

    impl RecordingNotifier {
        fn new() -> Self {
            Self {
                alerts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn present(&self, id: &str, title: &str, _message: &str) {
            self.alerts
                .lock()
                .unwrap()
                .push((id.to_string(), title.to_string()));
        }
    }

    fn fast_config() -> TrackerConfig {
        TrackerConfig {
            settle_delay_ms: 0,
            pacing_delay_ms: 0,
            extraction_timeout_ms: 1000,
            ..TrackerConfig::default()
        }
    }

    fn product(id: &str, price: &str) -> Product {
        Product::new(
            id.to_string(),
            format!("Product {}", id),
            format!("https://shop.example/{}", id),
            price.to_string(),
        )
    }

    struct Harness {
        storage: EngineStorage,
        fetcher: Arc<ScriptedFetcher>,
        notifier: Arc<RecordingNotifier>,
        coordinator: TrackingCoordinator,
    }

    fn harness(config: TrackerConfig, fetcher: ScriptedFetcher) -> Harness {
        let storage = EngineStorage::new(Arc::new(MemoryStore::new()));
        let fetcher = Arc::new(fetcher);
        let notifier = Arc::new(RecordingNotifier::new());
        let coordinator = TrackingCoordinator::new(
            config,
            storage.clone(),
            fetcher.clone(),
            notifier.clone(),
        );
        Harness {
            storage,
            fetcher,
            notifier,
            coordinator,
        }
    }

    #[tokio::test]
    async fn test_empty_product_list_is_a_no_op() {
        let h = harness(fast_config(), ScriptedFetcher::new());

        let results = h.coordinator.run_cycle().await;

        assert!(results.is_empty());
        assert_eq!(h.fetcher.opens(), 0);
    }

    #[tokio::test]
    async fn test_price_drop_detected_and_persisted() {
        let h = harness(
            fast_config(),
            ScriptedFetcher::new().with_price("https://shop.example/p1", "$29.99"),
        );
        h.storage
            .save_products(&[product("p1", "$39.99")])
            .await
            .unwrap();

        let results = h.coordinator.run_cycle().await;

        assert_eq!(results.len(), 1);
        let r = &results[0];
        assert!(r.success);
        assert!(r.changed);
        assert!(r.dropped);
        assert!((r.difference - 10.0).abs() < 1e-9);

        let tracking = h.storage.load_tracking().await;
        let record = tracking.get("p1").unwrap();
        assert_eq!(record.last_price, 29.99);
        assert_eq!(record.history.len(), 1);
        assert!(record.history[0].dropped);

        // Display text refreshed on the product itself
        let products = h.storage.load_products().await;
        assert_eq!(products[0].price, "$29.99");
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_the_cycle() {
        let h = harness(
            fast_config(),
            ScriptedFetcher::new()
                .with_failure("https://shop.example/a")
                .with_price("https://shop.example/b", "$15.00"),
        );
        h.storage
            .save_products(&[product("a", "$10.00"), product("b", "$20.00")])
            .await
            .unwrap();

        let results = h.coordinator.run_cycle().await;

        assert_eq!(results.len(), 2);
        assert!(!results[0].success);
        assert!(results[0].error.is_some());
        assert!(results[1].success);
        assert!(results[1].dropped);

        // B's record was still written
        let tracking = h.storage.load_tracking().await;
        assert_eq!(tracking.get("b").unwrap().last_price, 15.0);
        assert!(tracking.get("a").is_none());
    }

    #[tokio::test]
    async fn test_every_opened_page_is_closed() {
        let h = harness(
            fast_config(),
            ScriptedFetcher::new()
                .with_price("https://shop.example/a", "$10.00")
                .with_price("https://shop.example/b", "$20.00"),
        );
        h.storage
            .save_products(&[product("a", "$10.00"), product("b", "$20.00")])
            .await
            .unwrap();

        h.coordinator.run_cycle().await;

        assert_eq!(h.fetcher.opens(), 2);
        assert_eq!(h.fetcher.closes(), 2);
    }

    #[tokio::test]
    async fn test_unchanged_price_increments_same_count() {
        let h = harness(
            fast_config(),
            ScriptedFetcher::new().with_price("https://shop.example/p1", "$29.99"),
        );
        h.storage
            .save_products(&[product("p1", "$29.99")])
            .await
            .unwrap();

        h.coordinator.run_cycle().await;
        h.coordinator.run_cycle().await;

        let tracking = h.storage.load_tracking().await;
        let record = tracking.get("p1").unwrap();
        assert_eq!(record.same_count, 2);
        assert_eq!(record.history.len(), 2);
    }

    #[tokio::test]
    async fn test_page_without_price_node_is_not_a_change() {
        let h = harness(fast_config(), {
            let mut f = ScriptedFetcher::new();
            f.responses.insert("https://shop.example/p1".to_string(), None);
            f
        });
        h.storage
            .save_products(&[product("p1", "$29.99")])
            .await
            .unwrap();

        let results = h.coordinator.run_cycle().await;

        assert!(results[0].success);
        assert_eq!(results[0].current_price, 0.0);
        assert!(!results[0].changed);

        // An unparsed observation never overwrites the last known price
        let tracking = h.storage.load_tracking().await;
        assert_eq!(tracking.get("p1").unwrap().last_price, 29.99);
    }

    #[tokio::test]
    async fn test_drop_alert_raised_for_drop_policy() {
        let h = harness(
            fast_config(),
            ScriptedFetcher::new().with_price("https://shop.example/p1", "$29.99"),
        );
        h.storage
            .save_products(&[product("p1", "$39.99")])
            .await
            .unwrap();

        h.coordinator.run_cycle().await;

        let alerts = h.notifier.alerts.lock().unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].0, "p1");
        assert!(alerts[0].1.starts_with("Price drop"));
    }

    #[tokio::test]
    async fn test_same_price_policy_alerts_on_steady_price() {
        let config = TrackerConfig {
            alert_policy: AlertPolicy::SamePrice,
            ..fast_config()
        };
        let h = harness(
            config,
            ScriptedFetcher::new().with_price("https://shop.example/p1", "$29.99"),
        );
        h.storage
            .save_products(&[product("p1", "$29.99")])
            .await
            .unwrap();

        h.coordinator.run_cycle().await;

        let alerts = h.notifier.alerts.lock().unwrap();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].1.starts_with("Price unchanged"));
    }

    #[tokio::test]
    async fn test_history_respects_configured_bound() {
        let config = TrackerConfig {
            max_history: 3,
            ..fast_config()
        };
        let h = harness(
            config,
            ScriptedFetcher::new().with_price("https://shop.example/p1", "$29.99"),
        );
        h.storage
            .save_products(&[product("p1", "$29.99")])
            .await
            .unwrap();

        for _ in 0..5 {
            h.coordinator.run_cycle().await;
        }

        let tracking = h.storage.load_tracking().await;
        assert_eq!(tracking.get("p1").unwrap().history.len(), 3);
    }
}
