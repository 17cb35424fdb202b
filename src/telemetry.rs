//! Structured logging setup.
//!
//! Services emit `tracing` events with structured fields. Binaries and
//! embedding applications call [`init_tracing`] once at startup to install a
//! `tracing-subscriber` formatter filtered by [`LogSettings`] or `RUST_LOG`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Minimum severity recorded when no explicit filter is configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything.
    Trace,
    /// Diagnostic detail, including retried contention.
    Debug,
    /// State changes.
    #[default]
    Info,
    /// Recoverable anomalies.
    Warn,
    /// Swallowed failures.
    Error,
}

impl LogLevel {
    /// Returns the filter directive spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human-readable output.
    Pretty,
    /// Single-line human-readable output.
    #[default]
    Compact,
    /// Newline-delimited JSON.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Level applied to this crate when neither `filter` nor `RUST_LOG` is
    /// set.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Explicit filter directives, overriding `RUST_LOG` and `level`.
    pub filter: Option<String>,
    /// Include source file and line in each event.
    pub include_source: bool,
}

impl LogSettings {
    /// Builds the event filter.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::InvalidFilter`] when the directives cannot
    /// be parsed.
    pub fn env_filter(&self) -> Result<EnvFilter, TelemetryError> {
        let filter = self.filter.as_deref().map_or_else(
            || {
                EnvFilter::try_from_default_env()
                    .or_else(|_| EnvFilter::try_new(format!("billwright={}", self.level)))
            },
            EnvFilter::try_new,
        )?;
        Ok(filter)
    }
}

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directives are malformed.
    #[error("invalid log filter: {0}")]
    InvalidFilter(#[from] tracing_subscriber::filter::ParseError),
    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(Arc<dyn std::error::Error + Send + Sync>),
}

/// Installs the global `tracing` subscriber.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] for malformed directives or
/// [`TelemetryError::Install`] when a subscriber is already installed.
pub fn init_tracing(settings: &LogSettings) -> Result<(), TelemetryError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(settings.env_filter()?)
        .with_file(settings.include_source)
        .with_line_number(settings.include_source);
    let installed = match settings.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|err| TelemetryError::Install(Arc::from(err)))
}
