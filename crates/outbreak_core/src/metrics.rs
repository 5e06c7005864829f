//! Metrics collection for the simulation.
//!
//! Provides structured logging and counters for monitoring population
//! and churn while the simulation runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Counter names bumped by the world.
pub mod counters {
    pub const SPAWNED: &str = "spawned";
    pub const REMOVED: &str = "removed";
    pub const SHOTS: &str = "shots";
    pub const CONVERSIONS: &str = "conversions";
}

/// Ticks between population summaries.
const SUMMARY_INTERVAL: u64 = 1000;

/// Metrics collector for simulation statistics.
pub struct Metrics {
    tick_count: AtomicU64,
    entity_count: AtomicU64,
    hostile_count: AtomicU64,
    survivor_count: AtomicU64,
    pub counters: Mutex<HashMap<String, AtomicU64>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("tick_count", &self.tick_count())
            .field("entity_count", &self.entity_count())
            .finish_non_exhaustive()
    }
}

impl Metrics {
    /// Creates a new metrics collector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            entity_count: AtomicU64::new(0),
            hostile_count: AtomicU64::new(0),
            survivor_count: AtomicU64::new(0),
            counters: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick with its duration and population.
    pub fn record_tick(&self, duration: Duration, entities: usize, hostiles: usize, survivors: usize) {
        self.tick_count.fetch_add(1, Ordering::Relaxed);
        self.entity_count.store(entities as u64, Ordering::Relaxed);
        self.hostile_count.store(hostiles as u64, Ordering::Relaxed);
        self.survivor_count.store(survivors as u64, Ordering::Relaxed);

        let tick = self.tick_count.load(Ordering::Relaxed);
        if tick % SUMMARY_INTERVAL == 0 {
            tracing::info!(
                tick = tick,
                entities = entities,
                hostiles = hostiles,
                survivors = survivors,
                shots = self.counter(counters::SHOTS),
                conversions = self.counter(counters::CONVERSIONS),
                duration_us = duration.as_micros() as u64,
                "Population summary"
            );
        }
    }

    /// Increments a named counter.
    pub fn increment_counter(&self, name: &str) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Current value of a named counter, zero if it was never bumped.
    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .get(name)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn entity_count(&self) -> u64 {
        self.entity_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn hostile_count(&self) -> u64 {
        self.hostile_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn survivor_count(&self) -> u64 {
        self.survivor_count.load(Ordering::Relaxed)
    }

    /// Gets elapsed wall time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize the tracing subscriber for logging to stderr.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging(level: tracing::Level) {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::new();
        assert_eq!(metrics.tick_count(), 0);
        assert_eq!(metrics.counter(counters::SHOTS), 0);
    }

    #[test]
    fn test_record_tick() {
        let metrics = Metrics::new();
        metrics.record_tick(Duration::from_millis(16), 12, 7, 4);
        assert_eq!(metrics.tick_count(), 1);
        assert_eq!(metrics.entity_count(), 12);
        assert_eq!(metrics.hostile_count(), 7);
        assert_eq!(metrics.survivor_count(), 4);
    }

    #[test]
    fn test_increment_counter() {
        let metrics = Metrics::new();
        metrics.increment_counter(counters::SHOTS);
        metrics.increment_counter(counters::SHOTS);
        metrics.increment_counter(counters::CONVERSIONS);
        assert_eq!(metrics.counter(counters::SHOTS), 2);
        assert_eq!(metrics.counter(counters::CONVERSIONS), 1);
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging(tracing::Level::WARN);
        init_logging(tracing::Level::DEBUG);
    }
}
