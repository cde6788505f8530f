//! Diagnostic logging for the CLI.
//!
//! Library crates emit `tracing` events; this installs the subscriber that prints them to
//! stderr. User-facing messages do not go through here.

use std::io;

use tracing::debug;
use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, registry, util::SubscriberInitExt,
};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "BOOKSEARCH_LOG";

/// Returns the default filter directive for a `-v` count.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Installs the stderr subscriber.
///
/// `BOOKSEARCH_LOG` takes precedence over the `-v` count. Calling this twice is harmless.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(filter);

    if registry().with(stderr_layer).try_init().is_err() {
        debug!("log subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(default_directive(0), "warn");
        assert_eq!(default_directive(1), "info");
        assert_eq!(default_directive(2), "debug");
        assert_eq!(default_directive(9), "debug");
    }

    #[test]
    fn init_twice_does_not_panic() {
        init(0);
        init(2);
    }
}
