//! Implementation of `booksearch status`.

use std::process::ExitCode;

use booksearch_config::{ConfigWarning, discover_config_files};
use booksearch_index::Backend;

use crate::cli::{
    context::CommandContext,
    output::{dim, report_search_error, subheader, success, warning},
};

/// Shows configuration files, the backend and its health, and validation warnings.
pub async fn run(ctx: &CommandContext) -> ExitCode {
    let cwd = &ctx.cwd;
    let config = &ctx.config;

    let config_files = discover_config_files(cwd);
    println!("{}", subheader("Config files:"));
    if config_files.is_empty() {
        println!("   {}", dim("(none, using defaults)"));
    } else {
        for path in &config_files {
            println!("   {}", path.display());
        }
    }
    println!();

    println!("{}", subheader("Backend:"));
    println!("   {}", config.backend.url);
    println!("   {}", dim(&format!("index {}", config.backend.index)));

    let mut healthy = false;
    match ctx.backend_unchecked() {
        Ok(backend) => match backend.ping().await {
            Ok(info) => {
                healthy = true;
                let mut details = Vec::new();
                if let Some(name) = &info.cluster_name {
                    details.push(format!("cluster {name}"));
                }
                if let Some(version) = &info.version {
                    details.push(format!("version {version}"));
                }
                if details.is_empty() {
                    println!("   {}", success("reachable"));
                } else {
                    println!(
                        "   {} {}",
                        success("reachable"),
                        dim(&format!("({})", details.join(", ")))
                    );
                }
            }
            Err(e) => {
                println!("   {}", warning("unreachable"));
                report_search_error("backend health check failed", &e);
            }
        },
        Err(_) => println!("   {}", warning("invalid")),
    }
    println!();

    let warnings = config.validate();
    if warnings.is_empty() {
        if config_files.is_empty() {
            println!(
                "Run {} to create a configuration file.",
                subheader("booksearch init")
            );
        }
        println!("No issues found.");
        return if healthy {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    println!("{}", subheader(&format!("Warnings ({}):", warnings.len())));
    for w in &warnings {
        println!("   {}", warning(&w.to_string()));
    }
    println!();

    print_hints(&warnings);

    ExitCode::FAILURE
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    for w in warnings {
        match w {
            ConfigWarning::InvalidBackendUrl { .. } => {
                println!(
                    "{}",
                    dim("Hint: set [backend] url to e.g. \"http://localhost:9200\"")
                );
            }
            ConfigWarning::PageSizeExceedsCap { .. } => {
                println!(
                    "{}",
                    dim("Hint: raise [search] score_cap or lower page_size")
                );
            }
            ConfigWarning::MinHitsExceedsRoundSize { .. } => {
                println!(
                    "{}",
                    dim("Hint: keep [search] min_hits below full_round_size")
                );
            }
            _ => {}
        }
    }
}
