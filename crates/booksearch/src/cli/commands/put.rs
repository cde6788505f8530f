//! Implementation of `booksearch put`.

use std::{
    fs, io,
    path::{Path, PathBuf},
    process::ExitCode,
};

use booksearch_index::{Backend, Book};
use chrono::Utc;
use thiserror::Error;

use crate::cli::{
    args::PutCommand,
    context::CommandContext,
    output::{report_search_error, success},
};

/// Indexes a book read from a JSON file, replacing any book with the same ID.
pub async fn run(ctx: &CommandContext, cmd: &PutCommand) -> ExitCode {
    let book = match read_book(&cmd.file, cmd.id.as_deref()) {
        Ok(book) => book,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let backend = match ctx.backend().await {
        Ok(b) => b,
        Err(code) => return code,
    };

    if let Err(e) = backend.index_document(&book).await {
        report_search_error("failed to index book", &e);
        return ExitCode::FAILURE;
    }

    println!("{}", success(&format!("Indexed {}", book.id)));
    ExitCode::SUCCESS
}

/// Reasons a book file cannot be indexed.
#[derive(Debug, Error)]
enum BookFileError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path given on the command line.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The file is not a JSON book.
    #[error("invalid book file {path}: {source}")]
    Parse {
        /// Path given on the command line.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Neither the file nor `--id` names the book.
    #[error("book in {path} has no id; add an \"id\" field or pass --id")]
    MissingId {
        /// Path given on the command line.
        path: PathBuf,
    },
}

/// Reads and checks a book file. `id` overrides the file's own id.
///
/// A missing `created_at` is set to now.
fn read_book(path: &Path, id: Option<&str>) -> Result<Book, BookFileError> {
    let contents = fs::read_to_string(path).map_err(|source| BookFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut book: Book =
        serde_json::from_str(&contents).map_err(|source| BookFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if let Some(id) = id {
        book.id = id.to_string();
    }
    if book.id.trim().is_empty() {
        return Err(BookFileError::MissingId {
            path: path.to_path_buf(),
        });
    }
    if book.created_at.is_none() {
        book.created_at = Some(Utc::now());
    }
    Ok(book)
}
