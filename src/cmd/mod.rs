//! Subcommand dispatch and execution.
//!
//! [`dispatch`] routes the parsed CLI to [`run`] or [`health`]. With no
//! subcommand the top-level flags are handed to [`run`].

pub mod health;
pub mod run;

use crate::cli::{Cli, Commands};
use crate::error::RelayError;

pub async fn dispatch(cli: Cli) -> Result<(), RelayError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(args).await,
        Some(Commands::Health(args)) => health::execute(args).await,
        None => run::execute(cli.run).await,
    }
}
