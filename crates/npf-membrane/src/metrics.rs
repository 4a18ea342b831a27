//! Atomic counters for engine observability.
//!
//! All counters use relaxed ordering — they are advisory/diagnostic, not
//! synchronization primitives. Wired into the engine through
//! `npf_core::Config::on_event`, so `npf-core` itself never depends on
//! this crate.

use std::sync::atomic::{AtomicU64, Ordering};

use npf_core::Event;

/// Global engine operation counters.
pub struct EngineMetrics {
    /// Total `pprintf`/`snprintf` invocations.
    pub invocations: AtomicU64,
    /// Directives that failed to parse, or named a conversion a disabled
    /// toggle turned off, and were copied through as literal text.
    pub malformed_directives: AtomicU64,
    /// `%.0d`-of-`0`-style precision-zero suppressions.
    pub precision_zero_suppressions: AtomicU64,
    /// `%f`/`%F` calls that fell back to scientific notation.
    pub float_scientific_fallbacks: AtomicU64,
    /// `%n` writebacks performed.
    pub writebacks: AtomicU64,
}

impl EngineMetrics {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            invocations: AtomicU64::new(0),
            malformed_directives: AtomicU64::new(0),
            precision_zero_suppressions: AtomicU64::new(0),
            float_scientific_fallbacks: AtomicU64::new(0),
            writebacks: AtomicU64::new(0),
        }
    }

    pub fn inc(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            invocations: Self::get(&self.invocations),
            malformed_directives: Self::get(&self.malformed_directives),
            precision_zero_suppressions: Self::get(&self.precision_zero_suppressions),
            float_scientific_fallbacks: Self::get(&self.float_scientific_fallbacks),
            writebacks: Self::get(&self.writebacks),
        }
    }
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time snapshot of all engine counters.
#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub invocations: u64,
    pub malformed_directives: u64,
    pub precision_zero_suppressions: u64,
    pub float_scientific_fallbacks: u64,
    pub writebacks: u64,
}

static GLOBAL_METRICS: EngineMetrics = EngineMetrics::new();

/// Access the global metrics singleton.
#[must_use]
pub fn global_metrics() -> &'static EngineMetrics {
    &GLOBAL_METRICS
}

/// Record one call invocation. Callers wrap each `pprintf`/`snprintf` entry
/// point with this; it is not itself an `npf_core::Event` since it fires
/// once per call rather than once per directive.
pub fn record_invocation() {
    EngineMetrics::inc(&GLOBAL_METRICS.invocations);
}

/// The function pointer wired into `npf_core::Config::on_event`.
pub fn record_event(event: Event) {
    let counter = match event {
        Event::MalformedDirective => &GLOBAL_METRICS.malformed_directives,
        Event::PrecisionZeroSuppressed => &GLOBAL_METRICS.precision_zero_suppressions,
        Event::FloatScientificFallback => &GLOBAL_METRICS.float_scientific_fallbacks,
        Event::Writeback => &GLOBAL_METRICS.writebacks,
    };
    EngineMetrics::inc(counter);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let m = EngineMetrics::new();
        let snap = m.snapshot();
        assert_eq!(snap.invocations, 0);
        assert_eq!(snap.writebacks, 0);
    }

    #[test]
    fn increment_works() {
        let m = EngineMetrics::new();
        EngineMetrics::inc(&m.invocations);
        EngineMetrics::inc(&m.invocations);
        EngineMetrics::inc(&m.writebacks);
        let snap = m.snapshot();
        assert_eq!(snap.invocations, 2);
        assert_eq!(snap.writebacks, 1);
    }

    #[test]
    fn record_event_routes_to_the_right_counter() {
        let before = global_metrics().snapshot();
        record_event(Event::FloatScientificFallback);
        let after = global_metrics().snapshot();
        assert_eq!(after.float_scientific_fallbacks, before.float_scientific_fallbacks + 1);
    }
}
