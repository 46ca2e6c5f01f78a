//! Concentration band configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::analysis::{
    DEFAULT_HIGH_THRESHOLD, DEFAULT_MODERATE_THRESHOLD, DEFAULT_PERCENTAGE_SCALE,
};

/// HHI level bands and share precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcentrationConfig {
    /// HHI from which concentration is MODERATE.
    #[serde(default = "default_moderate_threshold")]
    pub moderate_threshold: Decimal,
    /// HHI from which concentration is HIGH.
    #[serde(default = "default_high_threshold")]
    pub high_threshold: Decimal,
    /// Decimal places on share percentages.
    #[serde(default = "default_precision")]
    pub precision: u32,
}

impl Default for ConcentrationConfig {
    fn default() -> Self {
        Self {
            moderate_threshold: DEFAULT_MODERATE_THRESHOLD,
            high_threshold: DEFAULT_HIGH_THRESHOLD,
            precision: DEFAULT_PERCENTAGE_SCALE,
        }
    }
}

const fn default_moderate_threshold() -> Decimal {
    DEFAULT_MODERATE_THRESHOLD
}

const fn default_high_threshold() -> Decimal {
    DEFAULT_HIGH_THRESHOLD
}

const fn default_precision() -> u32 {
    DEFAULT_PERCENTAGE_SCALE
}
