//! The single outbound call behind `GET /posts/{id}`.
//!
//! Each call builds its own hyper client and drops it on return, so no
//! connection outlives the request that opened it. The call runs under
//! [`UpstreamConfig::timeout`]; dropping the returned future (inbound
//! connection closed) abandons the outbound request with it.

use std::time::Instant;

use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::header::ACCEPT;
use hyper::Method;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use super::{classify, FetchError, PostId, UpstreamConfig};

pub type HttpsConnector = hyper_rustls::HttpsConnector<HttpConnector>;
pub type HttpClient = Client<HttpsConnector, Empty<Bytes>>;

#[must_use]
pub fn build_http_client() -> HttpClient {
    // rustls cannot pick a provider on its own when more than one is
    // compiled in; `ring` is the one this crate enables.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new())
        .pool_max_idle_per_host(0)
        .build(https)
}

/// Fetch one post and return its JSON body unmodified.
///
/// Emits the only log event for the outcome; callers attach request
/// context (correlation id) through the surrounding span.
#[allow(clippy::cast_possible_truncation)]
pub async fn fetch_post(config: &UpstreamConfig, id: &PostId) -> Result<Bytes, FetchError> {
    let url = config.post_url(id);

    let uri = url
        .parse::<hyper::Uri>()
        .map_err(|e| FetchError::Transport(format!("invalid upstream URL '{url}': {e}")))?;

    let request = hyper::Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(ACCEPT, "application/json")
        .body(Empty::<Bytes>::new())
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    let client = build_http_client();
    let start = Instant::now();
    tracing::debug!(url = %url, "fetching post");

    let exchange = async {
        let response = client
            .request(request)
            .await
            .map_err(|e| FetchError::Transport(error_chain(&e)))?;

        classify(response.status(), &url)?;

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| FetchError::Transport(format!("body read error: {e}")))?
            .to_bytes();

        serde_json::from_slice::<serde::de::IgnoredAny>(&body)
            .map_err(|e| FetchError::InvalidBody(e.to_string()))?;

        Ok::<_, FetchError>(body)
    };

    let result = tokio::time::timeout(config.timeout, exchange)
        .await
        .unwrap_or_else(|_| {
            Err(FetchError::Transport(format!(
                "request timed out after {}ms",
                config.timeout.as_millis()
            )))
        });
    let latency_ms = start.elapsed().as_millis() as u64;

    match &result {
        Ok(body) => tracing::info!(
            url = %url,
            bytes = body.len(),
            latency_ms,
            "upstream responded"
        ),
        Err(FetchError::NotFound) => tracing::info!(url = %url, latency_ms, "post not found"),
        Err(e) => tracing::warn!(url = %url, error = %e, latency_ms, "upstream fetch failed"),
    }

    result
}

/// Render an error with its whole `source()` chain. hyper's top-level
/// client errors ("client error (Connect)") say little on their own.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
