//! Implementation of `booksearch delete`.

use std::process::ExitCode;

use booksearch_index::Backend;

use crate::cli::{
    args::DeleteCommand,
    context::CommandContext,
    output::{report_search_error, success},
};

/// Deletes a stored book by ID.
pub async fn run(ctx: &CommandContext, cmd: &DeleteCommand) -> ExitCode {
    let backend = match ctx.backend().await {
        Ok(b) => b,
        Err(code) => return code,
    };

    match backend.delete_document(&cmd.id).await {
        Ok(true) => {
            println!("{}", success(&format!("Deleted {}", cmd.id)));
            ExitCode::SUCCESS
        }
        Ok(false) => {
            eprintln!("error: not found: {}", cmd.id);
            ExitCode::FAILURE
        }
        Err(e) => {
            report_search_error("failed to delete book", &e);
            ExitCode::FAILURE
        }
    }
}
