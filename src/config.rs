use std::path::PathBuf;
use std::time::Duration;

/// File-system locations of the mutual-TLS material.
#[derive(Clone, Debug)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
    pub trust_anchor: PathBuf,
}

#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// How the dispatcher prices generated orders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PricePolicy {
    /// Every order carries the same price.
    Fixed(u64),
    /// Uniform integer in [0, 1_000_000).
    Uniform,
}

/// Immutable flood configuration, resolved once at startup and handed to the
/// harness explicitly.
#[derive(Clone, Debug)]
pub struct FloodConfig {
    /// Total number of order submissions.
    pub requests: usize,
    /// Maximum submissions in flight at any instant.
    pub concurrency: usize,
    /// Per-request deadline; expiry cancels only that request's call.
    pub request_timeout: Duration,
    pub price_policy: PricePolicy,
    /// Cadence of the live progress log line; `None` disables the reporter.
    pub progress_interval: Option<Duration>,
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            requests: 10_000,
            concurrency: 100,
            request_timeout: Duration::from_secs(10),
            price_policy: PricePolicy::Uniform,
            progress_interval: Some(Duration::from_secs(5)),
        }
    }
}
