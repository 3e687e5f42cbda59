use serde::Serialize;

use crate::harness::ledger::{OrderOutcome, OutcomeRecord};

/// Distributional statistics over successful request latencies, in
/// milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LatencyStats {
    pub mean_ms: f64,
    pub stddev_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub max_ms: f64,
}

/// Reduced view of a sealed ledger.
///
/// Failed and timed-out requests are excluded from the latency distribution
/// so they cannot skew it; they only contribute to the counts. `latency` is
/// `None` when nothing succeeded.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SummaryStatistics {
    /// Number of successful submissions.
    pub count: u64,
    pub failure_count: u64,
    pub timeout_count: u64,
    pub latency: Option<LatencyStats>,
}

pub fn summarize(records: &[OutcomeRecord]) -> SummaryStatistics {
    let mut latencies_ms = Vec::with_capacity(records.len());
    let mut failure_count = 0u64;
    let mut timeout_count = 0u64;

    for record in records {
        match record.outcome {
            OrderOutcome::Success { latency } => {
                latencies_ms.push(latency.as_secs_f64() * 1_000.0)
            }
            OrderOutcome::Failure { .. } => failure_count += 1,
            OrderOutcome::Timeout { .. } => timeout_count += 1,
        }
    }
    latencies_ms.sort_by(f64::total_cmp);

    let latency = if latencies_ms.is_empty() {
        None
    } else {
        let n = latencies_ms.len() as f64;
        let mean = latencies_ms.iter().sum::<f64>() / n;
        let variance = latencies_ms
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>()
            / n;
        Some(LatencyStats {
            mean_ms: mean,
            stddev_ms: variance.sqrt(),
            p50_ms: percentile(&latencies_ms, 0.50),
            p95_ms: percentile(&latencies_ms, 0.95),
            p99_ms: percentile(&latencies_ms, 0.99),
            max_ms: *latencies_ms.last().expect("non-empty sample"),
        })
    };

    SummaryStatistics {
        count: latencies_ms.len() as u64,
        failure_count,
        timeout_count,
        latency,
    }
}

/// Order-statistic percentile with linear interpolation over an ascending
/// sorted sample, at rank `q * (n - 1)`.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let rank = q * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (rank - lo as f64) * (sorted[hi] - sorted[lo])
    }
}
