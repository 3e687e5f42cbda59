use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::FloodConfig;
use crate::exchange::OrderGateway;
use crate::types::{AuthSession, OrderRequest};

pub mod generator;
pub mod ledger;
pub mod progress;
pub mod summary;

use generator::OrderFactory;
use ledger::{LatencyLedger, OrderOutcome};
use progress::ProgressTracker;
use summary::{summarize, SummaryStatistics};

/// Outcome of one whole flood run.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub requests: u64,
    pub concurrency: usize,
    pub started_at: String,
    pub elapsed_ms: f64,
    pub throughput_rps: f64,
    pub summary: SummaryStatistics,
}

/// Runs the order flood: N dispatch tasks over a shared gateway, gated by a
/// counting semaphore of the configured capacity.
///
/// Dispatch requires an already-established session, so login failure
/// upstream means this is never reached. Every task converts its own
/// failures locally; one slow or broken request never touches its siblings.
pub async fn run_flood(
    cfg: &FloodConfig,
    gateway: Arc<dyn OrderGateway>,
    session: AuthSession,
) -> RunReport {
    let session = Arc::new(session);
    let limiter = Arc::new(Semaphore::new(cfg.concurrency));
    let ledger = Arc::new(LatencyLedger::with_capacity(cfg.requests));
    let tracker = Arc::new(ProgressTracker::default());
    let factory = OrderFactory::new(cfg.price_policy);

    let reporter = cfg.progress_interval.map(|every| {
        let tracker = Arc::clone(&tracker);
        let total = cfg.requests as u64;
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(every);
            tick.tick().await;
            loop {
                tick.tick().await;
                tracker.log_snapshot(total);
            }
        })
    });

    let started_at = Utc::now();
    let clock = Instant::now();

    let mut tasks = JoinSet::new();
    for seq in 0..cfg.requests as u64 {
        let gateway = Arc::clone(&gateway);
        let session = Arc::clone(&session);
        let limiter = Arc::clone(&limiter);
        let ledger = Arc::clone(&ledger);
        let tracker = Arc::clone(&tracker);
        let deadline = cfg.request_timeout;

        tasks.spawn(async move {
            let order = factory.draw(&mut rand::thread_rng());
            let permit = limiter.acquire_owned().await.expect("limiter closed");
            let outcome = dispatch_one(gateway.as_ref(), &session, &order, seq, deadline).await;
            drop(permit);

            tracker.observe(&outcome);
            ledger.record(seq, outcome);
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(err) = joined {
            // Dispatch converts its own errors; a join failure is a panic.
            tracing::error!(error = %err, "dispatch task aborted");
        }
    }
    if let Some(handle) = reporter {
        handle.abort();
    }

    let elapsed = clock.elapsed();
    let records = ledger.seal();
    let summary = summarize(&records);
    tracing::info!(
        requests = records.len() as u64,
        elapsed_ms = elapsed.as_secs_f64() * 1_000.0,
        successes = summary.count,
        failures = summary.failure_count,
        timeouts = summary.timeout_count,
        "flood complete"
    );

    RunReport {
        requests: records.len() as u64,
        concurrency: cfg.concurrency,
        started_at: started_at.to_rfc3339(),
        elapsed_ms: elapsed.as_secs_f64() * 1_000.0,
        throughput_rps: records.len() as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
        summary,
    }
}

/// Sends one order and classifies whatever came back. The deadline cancels
/// only this request's in-flight call.
async fn dispatch_one(
    gateway: &dyn OrderGateway,
    session: &AuthSession,
    order: &OrderRequest,
    seq: u64,
    deadline: Duration,
) -> OrderOutcome {
    let started = Instant::now();
    match tokio::time::timeout(deadline, gateway.submit_order(session, order)).await {
        Ok(Ok(_order_id)) => OrderOutcome::Success {
            latency: started.elapsed(),
        },
        Ok(Err(err)) => {
            tracing::warn!(seq, error = %err, "order submission failed");
            OrderOutcome::Failure {
                kind: err.kind(),
                latency: started.elapsed(),
            }
        }
        Err(_) => {
            tracing::warn!(seq, deadline_ms = deadline.as_millis() as u64, "order submission timed out");
            OrderOutcome::Timeout {
                latency: started.elapsed(),
            }
        }
    }
}
