//! Postrelay is a thin HTTP relay in front of the JSONPlaceholder API.
//!
//! It serves a welcome message at `GET /` and relays `GET /posts/{id}`
//! to the upstream, one outbound call per request, translating the
//! upstream status into a local response and passing the JSON body
//! through unchanged.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, health).
//! - [`error`] -- Process-level error type using `thiserror`.
//! - [`health`] -- `GET /health` endpoint handler returning runtime diagnostics.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`posts`] -- Welcome and post relay handlers, error body rendering.
//! - [`server`] -- Axum router, shared application state, graceful shutdown.
//! - [`upstream`] -- The outbound call and its status mapping.

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod error;
pub mod health;
pub mod logging;
pub mod posts;
pub mod server;
pub mod upstream;
