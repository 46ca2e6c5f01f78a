//! Configuration module for the risk calculation.
//!
//! Loads YAML configuration with environment variable interpolation and
//! validates it before it is turned into analysis settings, the geographic
//! classifier and processing options.
//!
//! # Usage
//!
//! ```rust,ignore
//! use risk_calculation::config::load_config;
//!
//! let config = load_config(Some("risk-calculation.yaml"))?;
//! let settings = config.analysis_settings()?;
//! ```

mod concentration;
mod currency;
mod geographic;
mod observability;
mod processing;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use concentration::ConcentrationConfig;
pub use currency::CurrencyConfig;
pub use geographic::GeographicConfig;
pub use observability::{LoggingConfig, ObservabilityConfig};
pub use processing::ProcessingConfig;

use crate::application::CalculationOptions;
use crate::domain::analysis::{AnalysisSettings, ConcentrationThresholds};
use crate::domain::classification::GeographicClassifier;

/// Largest accepted share precision.
const MAX_PRECISION: u32 = 10;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskCalculationConfig {
    /// Currency conversion.
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// HHI bands.
    #[serde(default)]
    pub concentration: ConcentrationConfig,
    /// Geographic classification.
    #[serde(default)]
    pub geographic: GeographicConfig,
    /// Batch processing.
    #[serde(default)]
    pub processing: ProcessingConfig,
    /// Observability.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl RiskCalculationConfig {
    /// HHI bands and share precision for the analysis.
    ///
    /// # Errors
    ///
    /// Returns error if the thresholds are out of order or outside `[0, 1]`.
    pub fn analysis_settings(&self) -> Result<AnalysisSettings, ConfigError> {
        let thresholds = ConcentrationThresholds::new(
            self.concentration.moderate_threshold,
            self.concentration.high_threshold,
        )
        .map_err(|e| ConfigError::ValidationError(format!("concentration: {e}")))?;
        Ok(AnalysisSettings {
            thresholds,
            percentage_scale: self.concentration.precision,
        })
    }

    /// Classifier for the configured home country and EU list.
    ///
    /// # Errors
    ///
    /// Returns error if a country code is malformed.
    pub fn classifier(&self) -> Result<GeographicClassifier, ConfigError> {
        GeographicClassifier::new(&self.geographic.home_country, &self.geographic.eu_countries)
            .map_err(|e| ConfigError::ValidationError(format!("geographic: {e}")))
    }

    /// Options for the calculation use case.
    #[must_use]
    pub const fn calculation_options(&self) -> CalculationOptions {
        CalculationOptions {
            preload_rates: self.currency.preload_enabled,
            parallel_threshold: self.processing.parallel_threshold,
            chunk_size: self.processing.chunk_size,
            max_threads: self.processing.max_threads,
            fail_on_unavailable_rate: self.processing.fail_on_unavailable_rate,
        }
    }
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<RiskCalculationConfig, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string.
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<RiskCalculationConfig, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: RiskCalculationConfig = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // constant pattern
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map(|m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

/// Validate configuration values.
///
/// # Errors
///
/// Returns the first violated rule as a `ValidationError`.
pub fn validate_config(config: &RiskCalculationConfig) -> Result<(), ConfigError> {
    if !config.currency.base_currency.trim().eq_ignore_ascii_case("EUR") {
        return Err(ConfigError::ValidationError(format!(
            "currency.base_currency must be EUR, got {}",
            config.currency.base_currency
        )));
    }

    config.analysis_settings()?;
    if config.concentration.precision > MAX_PRECISION {
        return Err(ConfigError::ValidationError(format!(
            "concentration.precision must be at most {MAX_PRECISION}"
        )));
    }

    config.classifier()?;

    if config.processing.chunk_size == 0 {
        return Err(ConfigError::ValidationError(
            "processing.chunk_size must be positive".to_string(),
        ));
    }
    if config.processing.parallel_threshold == 0 {
        return Err(ConfigError::ValidationError(
            "processing.parallel_threshold must be positive".to_string(),
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    let level = config.observability.logging.level.to_ascii_lowercase();
    if !valid_levels.contains(&level.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.level must be one of: {valid_levels:?}"
        )));
    }

    let valid_formats = ["json", "pretty", "compact"];
    if !valid_formats.contains(&config.observability.logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    Ok(())
}
