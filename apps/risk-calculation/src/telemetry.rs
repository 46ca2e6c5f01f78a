//! Tracing Setup
//!
//! Installs a `tracing-subscriber` fmt subscriber for the host process.
//!
//! # Configuration
//!
//! - `RUST_LOG`: overrides the configured level when set
//! - `observability.logging.format`: `json`, `pretty` or `compact`
//!
//! # Usage
//!
//! ```rust,ignore
//! use risk_calculation::{config::load_config, telemetry::init_logging};
//!
//! let config = load_config(None)?;
//! init_logging(&config.observability.logging)?;
//! ```

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Logging initialization errors.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured level is not a valid filter directive.
    #[error("Invalid log filter '{filter}': {message}")]
    InvalidFilter {
        /// Rejected filter.
        filter: String,
        /// Parser message.
        message: String,
    },

    /// The format is not one of `json`, `pretty` or `compact`.
    #[error("Unknown log format: {0}")]
    UnknownFormat(String),

    /// A global subscriber is already installed.
    #[error("Failed to install subscriber: {0}")]
    AlreadyInitialized(String),
}

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Returns error if the filter or format is invalid, or a subscriber is
/// already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);

    let installed = match config.format.as_str() {
        "json" => builder
            .json()
            .with_current_span(config.include_spans)
            .with_span_list(config.include_spans)
            .try_init(),
        "pretty" => builder.pretty().try_init(),
        "compact" => builder.compact().try_init(),
        other => return Err(TelemetryError::UnknownFormat(other.to_string())),
    };
    installed.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;

    tracing::debug!(
        level = %config.level,
        format = %config.format,
        "Logging initialized"
    );
    Ok(())
}

/// `RUST_LOG` when set, otherwise the configured level.
fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| TelemetryError::InvalidFilter {
        filter: config.level.clone(),
        message: e.to_string(),
    })
}
