//! Logging setup
//!
//! `RUST_LOG` wins over the configured level when set.

use anyhow::{Result, anyhow};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Filter directives for the configured level
#[must_use]
pub fn default_directives(level: &str) -> String {
    format!("warn,officemap={level},tower_http={level}")
}

/// Install the global subscriber. Logs go to stderr.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    installed.map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}
