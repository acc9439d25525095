//! Shared harness: an in-process mock upstream and a relay pointed at it.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use postrelay::server::{self, AppState};
use postrelay::upstream::UpstreamConfig;

/// Id the mock upstream answers with 404.
pub const MISSING_ID: i64 = 9999;
/// Id the mock upstream answers with 500.
pub const FAILING_ID: i64 = 500;
/// Id the mock upstream answers with 301.
pub const REDIRECT_ID: i64 = 301;
/// Id the mock upstream answers with a non-JSON 200.
pub const GARBAGE_ID: i64 = 777;
/// Id the mock upstream answers only after [`SLOW_DELAY`].
pub const SLOW_ID: i64 = 888;
pub const SLOW_DELAY: Duration = Duration::from_secs(2);
/// Id the mock upstream answers with a hand-formatted body.
pub const FORMATTED_ID: i64 = 42;

/// Body for [`FORMATTED_ID`]: not in serde_json's compact form (spacing,
/// key order, `\u` escapes, trailing newline).
pub const FORMATTED_BODY: &str =
    "{ \"title\" : \"caf\\u00e9 \\u2014 na\\u00efve\",\n  \"userId\": 1,   \"id\" : 42 }\n";

#[derive(Default)]
pub struct MockState {
    hits: AtomicUsize,
    ids: Mutex<Vec<String>>,
}

pub struct MockUpstream {
    pub addr: SocketAddr,
    state: Arc<MockState>,
    shutdown: tokio::sync::oneshot::Sender<()>,
}

impl MockUpstream {
    pub fn base_url(&self) -> url::Url {
        url::Url::parse(&format!("http://{}", self.addr)).unwrap()
    }

    pub fn hit_count(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Raw `{id}` segments received, in arrival order.
    pub fn received_ids(&self) -> Vec<String> {
        self.state.ids.lock().unwrap().clone()
    }

    pub fn stop(self) {
        let _ = self.shutdown.send(());
    }
}

/// Body the mock upstream returns for an ordinary id.
pub fn post_body(id: i64) -> String {
    if id == 1 {
        r#"{"id":1,"title":"foo"}"#.to_string()
    } else {
        format!(r#"{{"userId":1,"id":{id},"title":"post {id}","body":"body of {id}"}}"#)
    }
}

async fn mock_post(State(state): State<Arc<MockState>>, Path(raw_id): Path<String>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.ids.lock().unwrap().push(raw_id.clone());
    // Ids outside i64 behave like any other unknown post.
    let Ok(id) = raw_id.parse::<i64>() else {
        return (StatusCode::NOT_FOUND, "{}").into_response();
    };
    match id {
        MISSING_ID => (StatusCode::NOT_FOUND, "{}").into_response(),
        FAILING_ID => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        REDIRECT_ID => (StatusCode::MOVED_PERMANENTLY, [(LOCATION, "/posts/1")]).into_response(),
        GARBAGE_ID => (StatusCode::OK, "<html>not json</html>").into_response(),
        FORMATTED_ID => ([(CONTENT_TYPE, "application/json")], FORMATTED_BODY).into_response(),
        SLOW_ID => {
            tokio::time::sleep(SLOW_DELAY).await;
            ([(CONTENT_TYPE, "application/json")], post_body(id)).into_response()
        }
        _ => ([(CONTENT_TYPE, "application/json")], post_body(id)).into_response(),
    }
}

pub async fn start_mock_upstream() -> MockUpstream {
    let state = Arc::new(MockState::default());
    let router = Router::new()
        .route("/posts/{id}", get(mock_post))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    MockUpstream {
        addr,
        state,
        shutdown: shutdown_tx,
    }
}

/// An address nothing is listening on: bind an ephemeral port, then
/// release it.
pub async fn closed_base_url() -> url::Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    url::Url::parse(&format!("http://{addr}")).unwrap()
}

pub async fn start_relay(
    base_url: url::Url,
    timeout: Duration,
) -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
    let state = Arc::new(AppState::new(UpstreamConfig::new(base_url, timeout)));
    let router = server::build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    (addr, shutdown_tx)
}
