use reqwest::StatusCode;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal pre-flight failure: unusable TLS material or HTTP client. Nothing
/// is dispatched, authentication is never attempted.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {role} PEM at {path}")]
    Pem {
        role: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TLS material: {0}")]
    Tls(#[source] reqwest::Error),
    #[error("failed to build the HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Fatal login failure. The harness never dispatches without a session, so
/// this aborts the whole run with no retry.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("login rejected with status {status}")]
    Denied { status: StatusCode },
    #[error("login transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Per-request failure on a protected endpoint. Caught at the dispatch-unit
/// boundary and turned into a ledger entry; never aborts the run and never
/// cancels sibling requests.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("exchange answered with status {status}")]
    UnexpectedStatus { status: StatusCode },
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Transport(_) => FailureKind::Transport,
            ApiError::UnexpectedStatus { status } => FailureKind::UnexpectedStatus(status.as_u16()),
        }
    }
}

/// Ledger-facing classification of a failed submission. Timeouts are a
/// separate outcome variant, not a failure kind, so the summary can report
/// the two classes apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    Transport,
    UnexpectedStatus(u16),
}
