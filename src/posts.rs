//! Frontend handlers: the welcome route and the post relay.
//!
//! [`post_handler`] parses the path id, delegates to
//! [`upstream::fetch_post`](crate::upstream::fetch_post), and renders
//! either the upstream body (200) or a `{"detail": ...}` error.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::server::AppState;
use crate::upstream::{self, FetchError, PostId};

pub const WELCOME_MESSAGE: &str = "Welcome to the JSONPlaceholder API Consumer!";

static CORRELATION_ID: HeaderName = HeaderName::from_static("x-correlation-id");

#[derive(Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

impl IntoResponse for FetchError {
    fn into_response(self) -> Response {
        let body = ErrorDetail {
            detail: self.detail(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

pub async fn root_handler() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

pub async fn post_handler(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    req_headers: HeaderMap,
) -> Response {
    let correlation_id = req_headers
        .get(&CORRELATION_ID)
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);

    let id = match raw_id.parse::<PostId>() {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(
                correlation_id = %correlation_id,
                id = %raw_id,
                "rejected malformed post id"
            );
            let body = ErrorDetail {
                detail: e.to_string(),
            };
            let response = (StatusCode::UNPROCESSABLE_ENTITY, Json(body));
            return with_correlation_id(response.into_response(), &correlation_id);
        }
    };

    let span = tracing::info_span!("relay", correlation_id = %correlation_id, id = %id);
    let outcome = upstream::fetch_post(&state.upstream, &id)
        .instrument(span)
        .await;

    let response = match outcome {
        Ok(body) => {
            state.stats.forwarded.fetch_add(1, Ordering::Relaxed);
            (
                StatusCode::OK,
                [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
                body,
            )
                .into_response()
        }
        Err(e) => {
            if matches!(e, FetchError::NotFound) {
                state.stats.not_found.fetch_add(1, Ordering::Relaxed);
            } else {
                state.stats.failed.fetch_add(1, Ordering::Relaxed);
            }
            e.into_response()
        }
    };

    with_correlation_id(response, &correlation_id)
}

fn with_correlation_id(mut response: Response, correlation_id: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(correlation_id) {
        response.headers_mut().insert(CORRELATION_ID.clone(), value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_id_message() {
        let err = "abc".parse::<PostId>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid post id: 'abc' is not an integer");
    }

    #[test]
    fn not_found_renders_detail_body() {
        let response = FetchError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn correlation_id_is_attached() {
        let response = with_correlation_id(StatusCode::OK.into_response(), "abc-123");
        assert_eq!(response.headers().get("x-correlation-id").unwrap(), "abc-123");
    }
}
