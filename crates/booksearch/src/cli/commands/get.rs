//! Implementation of `booksearch get`.

use std::process::ExitCode;

use booksearch_index::Backend;

use crate::cli::{
    args::GetCommand,
    context::CommandContext,
    output::{print_book, print_json, report_search_error},
};

/// Retrieves a stored book by ID.
pub async fn run(ctx: &CommandContext, cmd: &GetCommand) -> ExitCode {
    let backend = match ctx.backend().await {
        Ok(b) => b,
        Err(code) => return code,
    };

    let book = match backend.get_document(&cmd.id).await {
        Ok(Some(book)) => book,
        Ok(None) => {
            eprintln!("error: not found: {}", cmd.id);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            report_search_error("failed to retrieve book", &e);
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        return print_json(&book);
    }

    print_book(&cmd.id, &book);
    ExitCode::SUCCESS
}
