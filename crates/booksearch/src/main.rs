//! Command-line interface for `booksearch`.

use std::process::ExitCode;

use booksearch::cli::{CommandContext, args::Cli, commands, logging};
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let ctx = if cli.command.needs_config() {
        CommandContext::load()
    } else {
        CommandContext::load_cwd_only()
    };
    let ctx = match ctx {
        Ok(ctx) => ctx.with_verbosity(cli.verbose),
        Err(code) => return code,
    };

    commands::run(cli.command, &ctx).await
}
