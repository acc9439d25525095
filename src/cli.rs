//! Command-line interface definitions using clap derive macros.
//!
//! Running `postrelay` with no subcommand starts the server with the
//! built-in defaults (`0.0.0.0:8000`, JSONPlaceholder upstream). Every
//! flag is optional and has an environment variable equivalent.

use clap::{Args, Parser, Subcommand, ValueEnum};
use url::Url;

use crate::upstream::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};

#[derive(Parser)]
#[command(
    name = "postrelay",
    version,
    about = "HTTP relay for JSONPlaceholder posts",
    propagate_version = true,
    args_conflicts_with_subcommands = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        postrelay                              Serve on 0.0.0.0:8000\n  \
        postrelay -p 8080 --pretty             Local dev mode\n  \
        postrelay health                       Probe a running instance"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the relay server (same as running with no subcommand)
    Run(RunArgs),

    /// Check health of a running instance
    Health(HealthArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Upstream base URL
    #[arg(
        long,
        env = "UPSTREAM_URL",
        default_value = DEFAULT_BASE_URL,
        value_parser = parse_upstream_url
    )]
    pub upstream: Url,

    /// Upstream request timeout in milliseconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout: u64,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:8000")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

/// Post paths are appended to the base URL, so it must end in a path:
/// a query or fragment would swallow `/posts/{id}`.
fn parse_upstream_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| format!("invalid URL '{raw}': {e}"))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{other}', expected http or https")),
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(format!(
            "upstream URL '{raw}' must not carry a query or fragment"
        ));
    }
    Ok(url)
}
