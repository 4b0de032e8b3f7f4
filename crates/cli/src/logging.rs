//! Logging setup

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "h5p_editor=info";

/// Initialize the global subscriber
///
/// `RUST_LOG` overrides the default filter. `H5P_LOG_FORMAT=json` switches to
/// structured JSON output; anything else gets the pretty formatter.
/// Logs go to stderr so command output stays pipeable.
pub fn init_logging() -> Result<()> {
    let log_format = std::env::var("H5P_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("Failed to create env filter")?;

    match log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    }
    .context("Failed to initialize logging")?;

    Ok(())
}
