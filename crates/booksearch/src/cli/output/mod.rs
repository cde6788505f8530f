//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use booksearch_highlight::{Highlighter, render_snippet, rule};
pub use booksearch_highlight::{dim, header, subheader, success, warning};
use booksearch_index::{
    Book, PipelineStats, Round, ScoredDocument, SearchError, SearchPlan, SearchResponse,
};
use booksearch_query::SortOrder;
use booksearch_score::Markers;
use chrono::{DateTime, Utc};
use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL_CONDENSED};
use serde::Serialize;

/// Characters of content shown by `get` without `--json`.
const PREVIEW_CHARS: usize = 2000;

/// JSON output for `search`.
#[derive(Serialize)]
struct JsonSearchOutput<'a> {
    /// The query as given.
    query: &'a str,
    /// Presentation order.
    sort: &'static str,
    /// Documents skipped.
    skip: usize,
    /// Ranked page.
    documents: &'a [ScoredDocument],
    /// Pipeline counts.
    stats: &'a PipelineStats,
}

/// Prints an error and, when one exists, a hint for fixing it.
pub fn report_search_error(context: &str, err: &SearchError) {
    eprintln!("error: {context}: {err}");
    if let Some(hint) = err.suggestion() {
        eprintln!("{}", dim(&format!("hint: {hint}")));
    }
}

/// Prints a value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Formats an optional timestamp as a calendar date.
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string())
}

/// Outputs a search response as JSON or as a table.
pub fn output_search_results(
    query: &str,
    sort: SortOrder,
    skip: usize,
    response: &SearchResponse,
    json: bool,
    verbose: u8,
) -> ExitCode {
    if json {
        return print_json(&JsonSearchOutput {
            query,
            sort: sort.as_str(),
            skip,
            documents: &response.documents,
            stats: &response.stats,
        });
    }

    if response.is_empty() {
        if verbose > 0 {
            print_pipeline_stats(&response.stats);
        }
        println!("{}", dim("No results found."));
        return ExitCode::SUCCESS;
    }

    println!("{}", results_table(&response.documents, skip));

    if verbose > 0 {
        println!();
        print_snippets(&response.documents, skip);
        print_pipeline_stats(&response.stats);
    }

    ExitCode::SUCCESS
}

/// Builds the results table. Ranks continue from `skip`.
fn results_table(documents: &[ScoredDocument], skip: usize) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["#", "Title", "Author", "Released", "Score", "ID"]);

    for (i, doc) in documents.iter().enumerate() {
        table.add_row(vec![
            Cell::new(skip + i + 1).set_alignment(CellAlignment::Right),
            Cell::new(&doc.title),
            Cell::new(&doc.author),
            Cell::new(format_date(doc.released_at)),
            Cell::new(format!("{:.2}", doc.score)).set_alignment(CellAlignment::Right),
            Cell::new(&doc.id),
        ]);
    }
    table
}

/// Prints the snippet that scored each document.
fn print_snippets(documents: &[ScoredDocument], skip: usize) {
    let markers = Markers::default();
    for (i, doc) in documents.iter().enumerate() {
        let snippet = doc.snippet.as_deref().map_or_else(
            || dim("(no complete match)"),
            |s| render_snippet(s, &markers),
        );
        println!("{} {snippet}", dim(&format!("{:>3}.", skip + i + 1)));
    }
    println!();
}

/// Prints pipeline counts.
fn print_pipeline_stats(stats: &PipelineStats) {
    println!("{}", dim("Pipeline:"));
    println!(
        "{}",
        dim(&format!(
            "  Terms: {} → Full round hits: {} → Fallback rounds: {} ({} hits)",
            stats.term_count, stats.full_round_hits, stats.fallback_rounds, stats.fallback_hits
        ))
    );
    println!(
        "{}",
        dim(&format!(
            "  Unique: {} → After cap: {} → Returned: {}",
            stats.unique_documents, stats.capped_documents, stats.returned_documents
        ))
    );
    if stats.skipped_documents > 0 {
        println!(
            "{}",
            warning(&format!(
                "  Skipped {} malformed document(s)",
                stats.skipped_documents
            ))
        );
    }
    println!();
}

/// Prints a search plan for `--explain`.
pub fn print_plan(query: &str, plan: &SearchPlan) -> ExitCode {
    println!("{}", subheader("Query:"));
    println!("   {query}");
    println!();

    println!("{}", subheader("Terms:"));
    for term in plan.terms.iter() {
        println!(
            "   {} {}",
            term.text(),
            dim(&format!("(fuzziness {})", term.max_fuzziness()))
        );
    }
    println!();

    println!("{}", subheader("Field:"));
    println!("   {}", plan.field);
    println!();

    let highlighter = Highlighter::new();
    for (round, body) in plan.request_bodies() {
        let title = match round {
            Round::Full => "Full round:".to_string(),
            Round::Fallback { omitted } => {
                let word = plan.terms.get(omitted).map_or("?", |t| t.text());
                format!("Fallback round (without \"{word}\"):")
            }
        };
        println!("{}", subheader(&title));
        match serde_json::to_string_pretty(&body) {
            Ok(json) => {
                for line in highlighter.highlight_json(&json).lines() {
                    println!("   {line}");
                }
            }
            Err(e) => {
                eprintln!("error: failed to serialize JSON: {e}");
                return ExitCode::FAILURE;
            }
        }
        println!();
    }

    if plan.fallback.is_empty() {
        println!("{}", dim("Single-term query: no fallback rounds."));
    } else {
        println!(
            "{}",
            dim("Fallback rounds run only when the full round returns too few hits.")
        );
    }

    ExitCode::SUCCESS
}

/// Prints a stored book.
pub fn print_book(id: &str, book: &Book) {
    println!("{}", header(&book.title));
    println!("{}", rule(40));
    println!("{}", dim(&format!("id {id}")));
    if !book.author.is_empty() {
        println!("{}", book.author);
    }
    println!(
        "{}",
        dim(&format!(
            "released {}, added {}",
            format_date(book.released_at),
            format_date(book.created_at)
        ))
    );

    if !book.content.is_empty() {
        println!();
        let preview = book.preview(PREVIEW_CHARS);
        println!("{preview}");
        if preview.len() < book.content.len() {
            println!(
                "{}",
                dim(&format!(
                    "… {} more characters (use --json for the full text)",
                    book.content[preview.len()..].chars().count()
                ))
            );
        }
    }
}
