//! Upstream forwarder: one outbound GET per relayed request.
//!
//! [`UpstreamConfig`] pins the base URL and the request timeout for the
//! process lifetime. [`fetch::fetch_post`] performs the call and maps
//! its outcome onto [`FetchError`], which the frontend renders as an
//! HTTP error response.

pub mod fetch;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use hyper::StatusCode;
use url::Url;

pub use fetch::fetch_post;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Upper bound on a single upstream call, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const ERROR_PREFIX: &str = "Error fetching post: ";

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl UpstreamConfig {
    #[must_use]
    pub fn new(base_url: Url, timeout: Duration) -> Self {
        Self { base_url, timeout }
    }

    /// Target URL for a post. `Url` always serializes a bare host with a
    /// trailing `/`, so it is trimmed before the path is appended.
    #[must_use]
    pub fn post_url(&self, id: &PostId) -> String {
        format!("{}/posts/{id}", self.base_url.as_str().trim_end_matches('/'))
    }
}

/// A post identifier: any integer, kept in canonical decimal form (sign
/// preserved, leading zeros dropped, `-0` folded to `0`). There is no
/// range limit; upstream decides which ids exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostId(String);

impl PostId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for PostId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid post id: '{0}' is not an integer")]
pub struct InvalidPostId(pub String);

impl FromStr for PostId {
    type Err = InvalidPostId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (negative, digits) = match raw.as_bytes().first() {
            Some(b'-') => (true, &raw[1..]),
            Some(b'+') => (false, &raw[1..]),
            _ => (false, raw),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidPostId(raw.to_string()));
        }

        let magnitude = digits.trim_start_matches('0');
        Ok(match (negative, magnitude.is_empty()) {
            (_, true) => Self("0".to_string()),
            (true, false) => Self(format!("-{magnitude}")),
            (false, false) => Self(magnitude.to_string()),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Post not found")]
    NotFound,

    #[error("{} '{status}' for url '{url}'", status_class(.status))]
    Upstream { status: StatusCode, url: String },

    #[error("{0}")]
    Transport(String),

    #[error("invalid JSON in upstream response: {0}")]
    InvalidBody(String),
}

impl FetchError {
    /// Status code the caller sees for this failure.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Upstream { .. } | Self::Transport(_) | Self::InvalidBody(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message placed in the `detail` field of the error body.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::NotFound => self.to_string(),
            other => format!("{ERROR_PREFIX}{other}"),
        }
    }
}

fn status_class(status: &StatusCode) -> &'static str {
    if status.is_informational() {
        "Informational response"
    } else if status.is_redirection() {
        "Redirect response"
    } else if status.is_client_error() {
        "Client error"
    } else {
        "Server error"
    }
}

/// Map an upstream status onto the relay outcome. Only 2xx passes; 404
/// is the one status with its own meaning, everything else is an error.
pub(crate) fn classify(status: StatusCode, url: &str) -> Result<(), FetchError> {
    if status == StatusCode::NOT_FOUND {
        Err(FetchError::NotFound)
    } else if status.is_success() {
        Ok(())
    } else {
        Err(FetchError::Upstream {
            status,
            url: url.to_string(),
        })
    }
}
