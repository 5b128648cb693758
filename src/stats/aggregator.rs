//! Running request count and elapsed-time total.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Point-in-time copy of the aggregate counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Submission attempts that reached the counting point.
    pub total_requests: u64,
    /// Cumulative time spent handling those attempts.
    pub total_elapsed_nanos: u128,
}

impl StatsSnapshot {
    /// Mean handling time in seconds, or `None` before the first sample.
    pub fn average_seconds(&self) -> Option<f64> {
        if self.total_requests == 0 {
            return None;
        }
        Some(self.total_elapsed_nanos as f64 / (1e9 * self.total_requests as f64))
    }

    /// Wire form served by `GET /stats`.
    pub fn report(&self) -> StatsReport {
        StatsReport {
            total: self.total_requests,
            average: self.average_seconds().unwrap_or(0.0),
        }
    }
}

/// JSON body for the stats endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    pub total: u64,
    /// Seconds.
    pub average: f64,
}

#[derive(Debug, Default)]
struct Counters {
    total_requests: u64,
    total_elapsed_nanos: u128,
}

/// Thread-safe accumulator for submission timings.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    counters: Mutex<Counters>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one submission attempt that took `elapsed`.
    pub fn record_sample(&self, elapsed: Duration) {
        let mut counters = self.counters.lock();
        counters.total_requests += 1;
        counters.total_elapsed_nanos += elapsed.as_nanos();
    }

    /// Read both counters under the same lock that updates them.
    pub fn snapshot(&self) -> StatsSnapshot {
        let counters = self.counters.lock();
        StatsSnapshot {
            total_requests: counters.total_requests,
            total_elapsed_nanos: counters.total_elapsed_nanos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn empty_snapshot_has_no_average() {
        let stats = StatsAggregator::new();
        let snap = stats.snapshot();
        assert_eq!(snap, StatsSnapshot::default());
        assert_eq!(snap.average_seconds(), None);
        assert_eq!(snap.report(), StatsReport { total: 0, average: 0.0 });
    }

    #[test]
    fn samples_accumulate() {
        let stats = StatsAggregator::new();
        stats.record_sample(Duration::from_millis(100));
        stats.record_sample(Duration::from_millis(300));

        let snap = stats.snapshot();
        assert_eq!(snap.total_requests, 2);
        assert_eq!(snap.total_elapsed_nanos, 400_000_000);

        let avg = snap.average_seconds().unwrap();
        assert!((avg - 0.2).abs() < 1e-9);
    }

    #[test]
    fn zero_duration_samples_still_count() {
        let stats = StatsAggregator::new();
        stats.record_sample(Duration::ZERO);
        let snap = stats.snapshot();
        assert_eq!(snap.total_requests, 1);
        assert_eq!(snap.average_seconds(), Some(0.0));
    }

    #[test]
    fn concurrent_samples_are_not_lost() {
        let stats = Arc::new(StatsAggregator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = Arc::clone(&stats);
                std::thread::spawn(move || {
                    let mut last = StatsSnapshot::default();
                    for _ in 0..1000 {
                        stats.record_sample(Duration::from_nanos(10));
                        let snap = stats.snapshot();
                        assert!(snap.total_requests >= last.total_requests);
                        assert!(snap.total_elapsed_nanos >= last.total_elapsed_nanos);
                        // each sample adds exactly 10ns, so the pair moves together
                        assert_eq!(snap.total_elapsed_nanos, snap.total_requests as u128 * 10);
                        last = snap;
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snap = stats.snapshot();
        assert_eq!(snap.total_requests, 8000);
        assert_eq!(snap.total_elapsed_nanos, 80_000);
    }

    #[test]
    fn report_serializes_total_and_average() {
        let report = StatsReport { total: 2, average: 0.5 };
        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json, serde_json::json!({"total": 2, "average": 0.5}));
    }
}
