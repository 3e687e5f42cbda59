//! Load-generation and latency-measurement bot for a remote order-matching
//! exchange.
//!
//! The exchange is consumed purely as an HTTP contract over mutual TLS:
//! authenticate once, then flood `POST /v1/orders` from N concurrent dispatch
//! tasks gated by a counting semaphore, record one latency outcome per
//! request, and reduce the sealed record set into summary statistics.

pub mod config;
pub mod error;
pub mod exchange;
pub mod harness;
pub mod types;

pub use crate::exchange::rest::RestClient;
pub use crate::harness::{run_flood, RunReport};
