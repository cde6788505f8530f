//! Implementation of `booksearch search`.

use std::process::ExitCode;

use booksearch_index::{SearchError, SearchRequest};
use tracing::info;

use crate::cli::{
    args::SearchCommand,
    context::CommandContext,
    output::{output_search_results, print_plan, report_search_error},
};

/// Searches the index and prints the ranked page.
pub async fn run(ctx: &CommandContext, cmd: &SearchCommand) -> ExitCode {
    let query = cmd.query_string();
    let request = match build_request(&query, cmd) {
        Ok(request) => request,
        Err(e) => {
            report_search_error("invalid search", &e);
            return ExitCode::FAILURE;
        }
    };

    let plan = match ctx.offline_searcher() {
        Ok(searcher) => searcher.plan(&request),
        Err(code) => return code,
    };
    let plan = match plan {
        Ok(plan) => plan,
        Err(e) => {
            report_search_error("invalid search", &e);
            return ExitCode::FAILURE;
        }
    };

    if cmd.explain {
        return print_plan(&query, &plan);
    }

    let searcher = match ctx.searcher().await {
        Ok(s) => s,
        Err(code) => return code,
    };

    let response = match searcher.search(&request).await {
        Ok(response) => response,
        Err(e) => {
            let context = if e.is_client_error() {
                "invalid search"
            } else {
                "search failed"
            };
            report_search_error(context, &e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        returned = response.stats.returned_documents,
        unique = response.stats.unique_documents,
        "search finished"
    );

    output_search_results(
        &query,
        request.sort,
        request.skip,
        &response,
        cmd.json,
        ctx.verbose,
    )
}

/// Builds a request from the command line, leaving unset options to configuration.
fn build_request(query: &str, cmd: &SearchCommand) -> Result<SearchRequest, SearchError> {
    let mut request = SearchRequest::new(query)
        .with_sort_key(&cmd.sort)?
        .with_skip(cmd.skip);
    if let Some(field) = &cmd.field {
        request = request.with_field(field);
    }
    if let Some(take) = cmd.take {
        request = request.with_take(take);
    }
    Ok(request)
}
