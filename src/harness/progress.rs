use hdrhistogram::Histogram;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::harness::ledger::OrderOutcome;

/// Millisecond latency histogram for in-flight progress reporting.
///
/// hdrhistogram gives cheap streaming quantiles while the flood is running;
/// the sealed ledger is still reduced exactly afterwards.
#[derive(Clone, Debug)]
pub struct Histo {
    inner: Histogram<u64>,
}

impl Default for Histo {
    fn default() -> Self {
        Self {
            inner: Histogram::new(3).expect("histo"),
        }
    }
}

impl Histo {
    pub fn record(&mut self, v: u64) {
        let _ = self.inner.record(v.max(1));
    }

    pub fn p50(&self) -> u64 {
        self.inner.value_at_quantile(0.50)
    }

    pub fn p95(&self) -> u64 {
        self.inner.value_at_quantile(0.95)
    }

    pub fn p99(&self) -> u64 {
        self.inner.value_at_quantile(0.99)
    }

    pub fn count(&self) -> u64 {
        self.inner.len()
    }
}

/// Shared counters the reporter task reads while dispatchers write.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    completed: AtomicU64,
    failed: AtomicU64,
    timed_out: AtomicU64,
    latency_ms: Mutex<Histo>,
}

impl ProgressTracker {
    pub fn observe(&self, outcome: &OrderOutcome) {
        match outcome {
            OrderOutcome::Success { latency } => {
                self.latency_ms.lock().record(latency.as_millis() as u64);
            }
            OrderOutcome::Failure { .. } => {
                self.failed.fetch_add(1, Ordering::Relaxed);
            }
            OrderOutcome::Timeout { .. } => {
                self.timed_out.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn log_snapshot(&self, total: u64) {
        let histo = self.latency_ms.lock();
        tracing::info!(
            done = self.completed.load(Ordering::Relaxed),
            total,
            failed = self.failed.load(Ordering::Relaxed),
            timed_out = self.timed_out.load(Ordering::Relaxed),
            p50_ms = histo.p50(),
            p95_ms = histo.p95(),
            p99_ms = histo.p99(),
            "flood progress"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn tracker_counts_every_outcome_class() {
        let tracker = ProgressTracker::default();
        tracker.observe(&OrderOutcome::Success {
            latency: Duration::from_millis(20),
        });
        tracker.observe(&OrderOutcome::Failure {
            kind: crate::error::FailureKind::Transport,
            latency: Duration::from_millis(5),
        });
        tracker.observe(&OrderOutcome::Timeout {
            latency: Duration::from_secs(10),
        });

        assert_eq!(tracker.completed.load(Ordering::Relaxed), 3);
        assert_eq!(tracker.failed.load(Ordering::Relaxed), 1);
        assert_eq!(tracker.timed_out.load(Ordering::Relaxed), 1);
        assert_eq!(tracker.latency_ms.lock().count(), 1);
    }

    #[test]
    fn histo_quantiles_track_recorded_values() {
        let mut histo = Histo::default();
        for ms in [10, 20, 30, 40, 50] {
            histo.record(ms);
        }
        assert_eq!(histo.count(), 5);
        assert!(histo.p50() >= 30 - 1 && histo.p50() <= 30);
        assert!(histo.p99() >= 50 - 1);
    }
}
