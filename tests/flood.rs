use async_trait::async_trait;
use exchange_load_bot::config::{FloodConfig, PricePolicy};
use exchange_load_bot::error::ApiError;
use exchange_load_bot::exchange::OrderGateway;
use exchange_load_bot::harness::run_flood;
use exchange_load_bot::types::{AuthSession, OrderId, OrderRequest};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn test_config(requests: usize, concurrency: usize, timeout: Duration) -> FloodConfig {
    FloodConfig {
        requests,
        concurrency,
        request_timeout: timeout,
        price_policy: PricePolicy::Uniform,
        progress_interval: None,
    }
}

fn session() -> AuthSession {
    AuthSession("test-token".into())
}

/// Accepts every order after a short delay, tracking how many submissions
/// were in flight at once.
#[derive(Default)]
struct CountingGateway {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

#[async_trait]
impl OrderGateway for CountingGateway {
    async fn submit_order(
        &self,
        _session: &AuthSession,
        _order: &OrderRequest,
    ) -> Result<OrderId, ApiError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(OrderId("stub".into()))
    }
}

/// Rejects every fourth submission with a 502.
#[derive(Default)]
struct FlakyGateway {
    calls: AtomicUsize,
}

#[async_trait]
impl OrderGateway for FlakyGateway {
    async fn submit_order(
        &self,
        _session: &AuthSession,
        _order: &OrderRequest,
    ) -> Result<OrderId, ApiError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call % 4 == 0 {
            Err(ApiError::UnexpectedStatus {
                status: StatusCode::BAD_GATEWAY,
            })
        } else {
            Ok(OrderId("stub".into()))
        }
    }
}

/// Never answers within any sane deadline.
struct StalledGateway;

#[async_trait]
impl OrderGateway for StalledGateway {
    async fn submit_order(
        &self,
        _session: &AuthSession,
        _order: &OrderRequest,
    ) -> Result<OrderId, ApiError> {
        tokio::time::sleep(Duration::from_secs(3_600)).await;
        Ok(OrderId("never".into()))
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn in_flight_submissions_never_exceed_the_limit() {
    let gateway = Arc::new(CountingGateway::default());
    let cfg = test_config(64, 8, Duration::from_secs(10));

    let report = run_flood(&cfg, gateway.clone(), session()).await;

    assert_eq!(report.requests, 64);
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 64);
    assert_eq!(report.summary.count, 64);
    let peak = gateway.peak.load(Ordering::SeqCst);
    assert!(peak <= 8, "peak in-flight was {peak}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn failures_are_isolated_and_fully_accounted() {
    let gateway = Arc::new(FlakyGateway::default());
    let cfg = test_config(40, 6, Duration::from_secs(10));

    let report = run_flood(&cfg, gateway, session()).await;

    let summary = &report.summary;
    assert_eq!(summary.failure_count, 10);
    assert_eq!(summary.timeout_count, 0);
    assert_eq!(
        summary.count + summary.failure_count + summary.timeout_count,
        40
    );
    assert!(summary.latency.is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stalled_requests_time_out_without_leaking_slots() {
    let cfg = test_config(20, 4, Duration::from_millis(50));

    // With a limiter of 4 and 20 stalled requests, a leaked slot would hang
    // this run forever; completion is the no-leak evidence.
    let report = run_flood(&cfg, Arc::new(StalledGateway), session()).await;
    assert_eq!(report.summary.timeout_count, 20);
    assert_eq!(report.summary.count, 0);
    assert_eq!(report.summary.latency, None);

    // And the harness is still healthy for a following run.
    let gateway = Arc::new(CountingGateway::default());
    let report = run_flood(&cfg, gateway, session()).await;
    assert_eq!(report.summary.count, 20);
}

#[tokio::test]
async fn empty_run_produces_an_empty_report() {
    let cfg = test_config(0, 4, Duration::from_secs(1));
    let report = run_flood(&cfg, Arc::new(CountingGateway::default()), session()).await;

    assert_eq!(report.requests, 0);
    assert_eq!(report.summary.count, 0);
    assert_eq!(report.summary.failure_count, 0);
    assert_eq!(report.summary.timeout_count, 0);
    assert_eq!(report.summary.latency, None);
}
