//! `postrelay run` — start the relay server.
//!
//! Initializes logging, builds the upstream settings from the parsed
//! flags, and serves the router until SIGTERM / Ctrl+C.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::RunArgs;
use crate::error::RelayError;
use crate::logging;
use crate::server::{self, AppState};
use crate::upstream::UpstreamConfig;

pub async fn execute(args: RunArgs) -> Result<(), RelayError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let upstream = UpstreamConfig::new(args.upstream, Duration::from_millis(args.timeout));
    let base_url = upstream.base_url.to_string();
    let state = Arc::new(AppState::new(upstream));
    let router = server::build_router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        upstream = %base_url,
        timeout_ms = args.timeout,
        "postrelay started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("postrelay stopped");
    Ok(())
}
