// Logging module for structured logging using the tracing crate

use std::error::Error;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable single line per event
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingOptions {
    /// Filter directive, e.g. `info` or `tidymark=debug`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Parse a filter directive from the command line.
///
/// The level comes only from the flag; `RUST_LOG` is not consulted.
pub fn build_filter(level: &str) -> Result<EnvFilter, Box<dyn Error + Send + Sync>> {
    Ok(EnvFilter::try_new(level)?)
}

/// Initialize the tracing subscriber for structured logging
///
/// Events go to stderr so that stdout only carries the tool's summary.
/// Colour codes are only emitted when stderr is a terminal.
///
/// # Errors
///
/// Returns an error if the filter directive is invalid or a global
/// subscriber is already installed.
///
/// # Examples
///
/// ```
/// use tidymark::logging::{init_subscriber, LoggingOptions};
///
/// init_subscriber(&LoggingOptions::default()).expect("Failed to initialize logging");
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber(options: &LoggingOptions) -> Result<(), Box<dyn Error + Send + Sync>> {
    let filter = build_filter(&options.level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false);

    match options.format {
        LogFormat::Text => builder.try_init()?,
        LogFormat::Json => builder.json().try_init()?,
    }

    Ok(())
}
