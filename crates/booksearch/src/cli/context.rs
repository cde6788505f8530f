//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use booksearch_config::Config;
use booksearch_index::{ElasticBackend, SearchParams, Searcher};

use super::output::report_search_error;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (default if no config files were found).
    pub config: Config,
    /// Number of `-v` flags.
    pub verbose: u8,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self {
            cwd,
            config,
            verbose: 0,
        })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used by `init`, which must work even when an existing config file is invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
            verbose: 0,
        })
    }

    /// Sets the verbosity.
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        self.verbose = verbose;
        self
    }

    /// Creates a gateway without waiting for the backend.
    pub fn backend_unchecked(&self) -> Result<ElasticBackend, ExitCode> {
        ElasticBackend::new(&self.config.backend).map_err(|e| {
            report_search_error("failed to configure backend", &e);
            ExitCode::FAILURE
        })
    }

    /// Connects to the backend, retrying as configured.
    pub async fn backend(&self) -> Result<ElasticBackend, ExitCode> {
        ElasticBackend::connect(&self.config.backend)
            .await
            .map_err(|e| {
                report_search_error("failed to connect to backend", &e);
                ExitCode::FAILURE
            })
    }

    /// Returns a searcher that has not contacted the backend.
    pub fn offline_searcher(&self) -> Result<Searcher<ElasticBackend>, ExitCode> {
        let backend = self.backend_unchecked()?;
        Ok(Searcher::new(backend, SearchParams::from_config(&self.config)))
    }

    /// Connects to the backend and returns a searcher over it.
    pub async fn searcher(&self) -> Result<Searcher<ElasticBackend>, ExitCode> {
        let backend = self.backend().await?;
        Ok(Searcher::new(backend, SearchParams::from_config(&self.config)))
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
