//! Gateway error types
//!
//! Transport failures (timeouts, refused connections, unreadable bodies) are
//! absorbed by the gateway client and never show up here. What remains are
//! mistakes in how a request was put together.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request could not be built, usually a malformed configured URL
    #[error("invalid gateway request: {0}")]
    InvalidRequest(#[source] reqwest::Error),

    /// Rebuilding the HTTP client to drop its cookies failed
    #[error("failed to reset HTTP session: {0}")]
    SessionReset(#[source] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Whether a reqwest error belongs to the network rather than to the caller
pub fn is_transport(err: &reqwest::Error) -> bool {
    !err.is_builder()
}
