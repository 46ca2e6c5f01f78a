//! Herfindahl-Hirschman concentration index.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::breakdown::Breakdown;
use crate::domain::shared::DomainError;

/// HHI at or above which concentration is MODERATE.
pub const DEFAULT_MODERATE_THRESHOLD: Decimal = dec!(0.15);

/// HHI at or above which concentration is HIGH.
pub const DEFAULT_HIGH_THRESHOLD: Decimal = dec!(0.25);

/// Qualitative concentration level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConcentrationLevel {
    /// Diversified.
    Low,
    /// Moderately concentrated.
    Moderate,
    /// Highly concentrated.
    High,
}

impl ConcentrationLevel {
    /// Level name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for ConcentrationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Band boundaries for [`ConcentrationLevel`].
///
/// `value < moderate` is LOW, `moderate <= value < high` is MODERATE and
/// `value >= high` is HIGH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcentrationThresholds {
    /// Lower bound of MODERATE.
    pub moderate: Decimal,
    /// Lower bound of HIGH.
    pub high: Decimal,
}

impl ConcentrationThresholds {
    /// Create validated thresholds.
    ///
    /// # Errors
    ///
    /// Returns error unless `0 <= moderate < high <= 1`.
    pub fn new(moderate: Decimal, high: Decimal) -> Result<Self, DomainError> {
        if moderate < Decimal::ZERO || high > Decimal::ONE || moderate >= high {
            return Err(DomainError::invalid(
                "concentration_thresholds",
                format!("expected 0 <= moderate < high <= 1, got {moderate} and {high}"),
            ));
        }
        Ok(Self { moderate, high })
    }

    /// Level for an HHI value.
    #[must_use]
    pub fn classify(&self, value: Decimal) -> ConcentrationLevel {
        if value >= self.high {
            ConcentrationLevel::High
        } else if value >= self.moderate {
            ConcentrationLevel::Moderate
        } else {
            ConcentrationLevel::Low
        }
    }
}

impl Default for ConcentrationThresholds {
    fn default() -> Self {
        Self {
            moderate: DEFAULT_MODERATE_THRESHOLD,
            high: DEFAULT_HIGH_THRESHOLD,
        }
    }
}

/// Concentration index in `[0, 1]` with its level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hhi {
    value: Decimal,
    level: ConcentrationLevel,
}

impl Hhi {
    /// Create an HHI classified with the default thresholds.
    ///
    /// # Errors
    ///
    /// Returns error if `value` is outside `[0, 1]`.
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        Self::with_thresholds(value, &ConcentrationThresholds::default())
    }

    /// Create an HHI classified with `thresholds`.
    ///
    /// # Errors
    ///
    /// Returns error if `value` is outside `[0, 1]`.
    pub fn with_thresholds(
        value: Decimal,
        thresholds: &ConcentrationThresholds,
    ) -> Result<Self, DomainError> {
        if value < Decimal::ZERO || value > Decimal::ONE {
            return Err(DomainError::invalid(
                "hhi",
                format!("HHI must be between 0 and 1, got {value}"),
            ));
        }
        Ok(Self {
            value,
            level: thresholds.classify(value),
        })
    }

    /// HHI of `breakdown` with the default thresholds.
    #[must_use]
    pub fn calculate(breakdown: &Breakdown) -> Self {
        Self::calculate_with(breakdown, &ConcentrationThresholds::default())
    }

    /// HHI of `breakdown`: sum of squared decimal shares.
    ///
    /// An empty breakdown has HHI 0.
    #[must_use]
    pub fn calculate_with(breakdown: &Breakdown, thresholds: &ConcentrationThresholds) -> Self {
        let sum: Decimal = breakdown
            .shares()
            .values()
            .map(|share| {
                let s = share.decimal_share();
                s * s
            })
            .sum();
        // rounded percentages can push a single full share marginally over 1
        let value = sum.min(Decimal::ONE);
        Self {
            value,
            level: thresholds.classify(value),
        }
    }

    /// Index value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.value
    }

    /// Concentration level.
    #[must_use]
    pub const fn level(&self) -> ConcentrationLevel {
        self.level
    }

    /// Equivalent number of equally sized categories, `1 / HHI`.
    ///
    /// Zero when the index is zero.
    #[must_use]
    pub fn effective_categories(&self) -> Decimal {
        if self.value.is_zero() {
            Decimal::ZERO
        } else {
            Decimal::ONE / self.value
        }
    }
}
