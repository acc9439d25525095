//! Process-level error type for postrelay.
//!
//! [`RelayError`] covers startup and CLI failures (bad listen address,
//! bind errors, health probe failures). Per-request upstream failures
//! live in [`FetchError`](crate::upstream::FetchError) and never reach
//! this type: they are rendered as HTTP responses instead.

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RelayError {
    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(hyper::StatusCode),
}
