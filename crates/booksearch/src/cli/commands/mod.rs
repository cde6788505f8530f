//! Command implementations and dispatch.

pub mod config;
pub mod delete;
pub mod get;
pub mod init;
pub mod put;
pub mod search;
pub mod status;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub async fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Search(cmd) => search::run(ctx, &cmd).await,
        Commands::Get(cmd) => get::run(ctx, &cmd).await,
        Commands::Put(cmd) => put::run(ctx, &cmd).await,
        Commands::Delete(cmd) => delete::run(ctx, &cmd).await,
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Status => status::run(ctx).await,
        Commands::Config => config::run(ctx),
    }
}
