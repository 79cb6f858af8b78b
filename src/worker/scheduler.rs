//! Recurring check scheduling
//!
//! One named recurring timer drives cycles; a manual trigger runs the
//! same cycle on demand. A single-flight guard fences the two against
//! each other: two cycles never run over the tracking map concurrently.

use crate::models::CheckResult;
use crate::services::TrackingCoordinator;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, instrument};

/// Name of the engine's single recurring timer
const CHECK_TIMER: &str = "price-check";

/// Registry of named recurring timers
///
/// Registering a name that already exists cancels the old timer first,
/// so setup is idempotent across restarts. Backed by tokio tasks here;
/// the same surface maps onto OS timers or a cron runner elsewhere.
pub struct TimerRegistry {
    timers: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self {
            timers: Mutex::new(HashMap::new()),
        }
    }

    /// (Re)create the named timer. `on_fire` runs once per period.
    pub fn register<F, Fut>(&self, name: &str, period_minutes: u64, on_fire: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel(name);

        let period = Duration::from_secs(period_minutes * 60);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately; the timer contract
            // is one full period before the first fire
            ticker.tick().await;
            loop {
                ticker.tick().await;
                on_fire().await;
            }
        });

        self.timers
            .lock()
            .expect("timer registry lock poisoned")
            .insert(name.to_string(), handle);
    }

    /// Stop and forget the named timer. Unknown names are a no-op.
    pub fn cancel(&self, name: &str) {
        let handle = self
            .timers
            .lock()
            .expect("timer registry lock poisoned")
            .remove(name);
        if let Some(handle) = handle {
            handle.abort();
            info!(timer = name, "Cancelled recurring timer");
        }
    }
}

impl Default for TimerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TimerRegistry {
    fn drop(&mut self) {
        if let Ok(mut timers) = self.timers.lock() {
            for handle in timers.values() {
                handle.abort();
            }
            timers.clear();
        }
    }
}

/// The engine's lifecycle object: owns the recurring timer and the
/// manual trigger over one shared coordinator.
pub struct CheckScheduler {
    registry: TimerRegistry,
    coordinator: Arc<TrackingCoordinator>,
    in_flight: Arc<AtomicBool>,
}

impl CheckScheduler {
    pub fn new(coordinator: Arc<TrackingCoordinator>) -> Self {
        Self {
            registry: TimerRegistry::new(),
            coordinator,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start (or restart) the recurring check timer.
    #[instrument(skip(self))]
    pub fn start(&self, period_minutes: u64) {
        let coordinator = self.coordinator.clone();
        let in_flight = self.in_flight.clone();

        info!(period_minutes = period_minutes, "Starting check scheduler");
        self.registry.register(CHECK_TIMER, period_minutes, move || {
            let coordinator = coordinator.clone();
            let in_flight = in_flight.clone();
            async move {
                run_guarded(&coordinator, &in_flight, "timer").await;
            }
        });
    }

    /// Stop the recurring timer. An in-flight cycle finishes on its own.
    pub fn stop(&self) {
        self.registry.cancel(CHECK_TIMER);
    }

    /// Run a cycle now. Dropped (returning empty) when one is in flight.
    pub async fn trigger_now(&self) -> Vec<CheckResult> {
        run_guarded(&self.coordinator, &self.in_flight, "manual").await
    }
}

/// Single-flight fence around the coordinator.
///
/// Whoever wins the flag runs the cycle; a loser is dropped rather than
/// queued - the next timer fire covers everything anyway.
async fn run_guarded(
    coordinator: &TrackingCoordinator,
    in_flight: &AtomicBool,
    origin: &str,
) -> Vec<CheckResult> {
    if in_flight
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        info!(origin = origin, "Cycle already in flight, trigger dropped");
        return Vec::new();
    }

    let results = coordinator.run_cycle().await;
    in_flight.store(false, Ordering::SeqCst);
    results
}
