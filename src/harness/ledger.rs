use parking_lot::Mutex;
use serde::Serialize;
use std::time::Duration;

use crate::error::FailureKind;

/// Terminal result of one dispatched order request. Exactly one of these is
/// recorded per sequence id.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum OrderOutcome {
    /// The exchange accepted the order.
    Success { latency: Duration },
    /// Transport failed or the exchange answered non-2xx.
    Failure {
        kind: FailureKind,
        latency: Duration,
    },
    /// The per-request deadline elapsed before a response.
    Timeout { latency: Duration },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OutcomeRecord {
    pub seq: u64,
    pub outcome: OrderOutcome,
}

/// Completion-ordered record of every dispatched request.
///
/// Appends from concurrent dispatch tasks are serialized behind a mutex, so
/// entries land in completion order, not submission order. `seal` takes the
/// records out once the run is over; after a full run their count equals the
/// configured request count.
#[derive(Debug, Default)]
pub struct LatencyLedger {
    records: Mutex<Vec<OutcomeRecord>>,
}

impl LatencyLedger {
    pub fn with_capacity(requests: usize) -> Self {
        Self {
            records: Mutex::new(Vec::with_capacity(requests)),
        }
    }

    pub fn record(&self, seq: u64, outcome: OrderOutcome) {
        self.records.lock().push(OutcomeRecord { seq, outcome });
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Empties the ledger and hands back the record set for aggregation.
    pub fn seal(&self) -> Vec<OutcomeRecord> {
        std::mem::take(&mut *self.records.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn records_accumulate_and_seal_drains() {
        let ledger = LatencyLedger::with_capacity(2);
        ledger.record(
            0,
            OrderOutcome::Success {
                latency: Duration::from_millis(12),
            },
        );
        ledger.record(
            1,
            OrderOutcome::Timeout {
                latency: Duration::from_secs(10),
            },
        );
        assert_eq!(ledger.len(), 2);

        let records = ledger.seal();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].seq, 0);
        assert!(ledger.is_empty());
    }
}
