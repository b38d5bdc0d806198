//! Structured logging setup.
//!
//! Log lines go to stderr so that CLI output on stdout stays clean. The
//! filter comes from `RUST_LOG` when it is set, otherwise from
//! `[logging].filter` in the config file.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Builds the filter: `RUST_LOG` first, then the configured directive, then `info`.
pub fn filter_from(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Returns `false` if one was already
/// installed; the existing subscriber is kept and the reason goes to stderr.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter_from(config))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    match result {
        Ok(()) => true,
        Err(e) => {
            eprintln!("logging not initialized: {}", e);
            tracing::debug!(error = %e, "tracing subscriber already installed");
            false
        }
    }
}
