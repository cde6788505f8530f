//! Clap argument definitions for the `booksearch` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "booksearch")]
#[command(about = "Fuzzy proximity search over an Elasticsearch book index")]
pub struct Cli {
    /// Verbosity (-v adds snippets and statistics to results and info logs, -vv debug logs)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for `booksearch search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Words to search for, in order
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Document field to search [default: content]
    #[arg(short = 'f', long)]
    pub field: Option<String>,

    /// Result order: score, time_new, time_old, alphabet
    #[arg(short = 's', long, default_value = "score")]
    pub sort: String,

    /// Results to skip
    #[arg(long, default_value_t = 0)]
    pub skip: usize,

    /// Results to return [default: 10]
    #[arg(short = 'n', long)]
    pub take: Option<usize>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Show the terms and generated backend queries without searching
    #[arg(long)]
    pub explain: bool,
}

impl SearchCommand {
    /// Returns the query words joined into one query string.
    pub fn query_string(&self) -> String {
        self.query.join(" ")
    }
}

/// Arguments for `booksearch get`.
#[derive(Args, Debug, Clone)]
pub struct GetCommand {
    /// Document ID
    pub id: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `booksearch put`.
#[derive(Args, Debug, Clone)]
pub struct PutCommand {
    /// JSON file holding the book
    pub file: PathBuf,

    /// Document ID, overriding the file's "id" field
    #[arg(long)]
    pub id: Option<String>,
}

/// Arguments for `booksearch delete`.
#[derive(Args, Debug, Clone)]
pub struct DeleteCommand {
    /// Document ID
    pub id: String,
}

/// Arguments for `booksearch init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.booksearch.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `booksearch` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Search books by words that appear close together
    #[command(after_help = "\
MATCHING:
  Words must appear in the given order with at most one other word between
  neighbours. Each word tolerates typos by length:
    1-3 chars   exact
    4-7 chars   one edit
    8+ chars    two edits

  When the full query finds too few books, the search is repeated once per
  word with that word left out. Those results rank below full matches.

EXAMPLES:
  booksearch search old man sea
  booksearch search ancient mariner --sort time_old
  booksearch search whale --field title -n 20 --skip 20
  booksearch search old man sea --explain")]
    Search(SearchCommand),

    /// Show a stored book by ID
    Get(GetCommand),

    /// Add or replace a book from a JSON file
    Put(PutCommand),

    /// Delete a book by ID
    Delete(DeleteCommand),

    /// Initialize booksearch configuration in current directory
    Init(InitCommand),

    /// Show configuration, backend health and validation warnings
    Status,

    /// Show effective configuration settings
    Config,
}

impl Commands {
    /// Returns false for commands that must work while the configuration is broken.
    pub fn needs_config(&self) -> bool {
        !matches!(self, Self::Init(_))
    }
}
