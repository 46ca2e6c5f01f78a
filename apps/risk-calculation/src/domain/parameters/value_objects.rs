//! Risk parameter value objects.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::errors::ParametersError;
use crate::domain::shared::EurAmount;

/// Months after its reference date during which a capital figure is current.
pub const CAPITAL_VALIDITY_MONTHS: u32 = 12;

fn check_percent(field: &str, value: Decimal) -> Result<(), ParametersError> {
    if value <= Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(ParametersError::invalid(
            field,
            format!("must be in (0, 100], got {value}"),
        ));
    }
    Ok(())
}

/// Large exposure limits (CRR Art. 392/395).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LargeExposuresParameters {
    limit_percent: Decimal,
    classification_threshold_percent: Decimal,
    max_large_exposures: u32,
}

impl LargeExposuresParameters {
    /// Create validated parameters.
    ///
    /// # Errors
    ///
    /// Returns error unless `0 < classification <= limit <= 100` and
    /// `max_large_exposures > 0`.
    pub fn new(
        limit_percent: Decimal,
        classification_threshold_percent: Decimal,
        max_large_exposures: u32,
    ) -> Result<Self, ParametersError> {
        let params = Self {
            limit_percent,
            classification_threshold_percent,
            max_large_exposures,
        };
        params.check()?;
        Ok(params)
    }

    fn check(&self) -> Result<(), ParametersError> {
        check_percent("large_exposure_limit_percent", self.limit_percent)?;
        check_percent(
            "classification_threshold_percent",
            self.classification_threshold_percent,
        )?;
        if self.classification_threshold_percent > self.limit_percent {
            return Err(ParametersError::invalid(
                "classification_threshold_percent",
                "cannot exceed the large exposure limit",
            ));
        }
        if self.max_large_exposures == 0 {
            return Err(ParametersError::invalid(
                "max_large_exposures",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Limit on a single exposure as percent of eligible capital.
    #[must_use]
    pub const fn limit_percent(&self) -> Decimal {
        self.limit_percent
    }

    /// Percent of eligible capital from which an exposure is large.
    #[must_use]
    pub const fn classification_threshold_percent(&self) -> Decimal {
        self.classification_threshold_percent
    }

    /// Maximum number of large exposures.
    #[must_use]
    pub const fn max_large_exposures(&self) -> u32 {
        self.max_large_exposures
    }

    /// Returns true if the values are consistent.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
    }
}

impl Default for LargeExposuresParameters {
    fn default() -> Self {
        Self {
            limit_percent: dec!(25),
            classification_threshold_percent: dec!(10),
            max_large_exposures: 20,
        }
    }
}

/// Capital base the large exposure ratios are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalBaseParameters {
    eligible_capital: EurAmount,
    tier1_capital: EurAmount,
    reference_date: Option<NaiveDate>,
}

impl CapitalBaseParameters {
    /// Create validated capital figures.
    ///
    /// # Errors
    ///
    /// Returns error if eligible capital is zero or tier 1 exceeds it.
    pub fn new(
        eligible_capital: EurAmount,
        tier1_capital: EurAmount,
        reference_date: NaiveDate,
    ) -> Result<Self, ParametersError> {
        let params = Self {
            eligible_capital,
            tier1_capital,
            reference_date: Some(reference_date),
        };
        params.check()?;
        Ok(params)
    }

    fn check(&self) -> Result<(), ParametersError> {
        if !self.eligible_capital.is_positive() {
            return Err(ParametersError::invalid(
                "eligible_capital",
                "must be positive",
            ));
        }
        if self.tier1_capital > self.eligible_capital {
            return Err(ParametersError::invalid(
                "tier1_capital",
                "cannot exceed eligible capital",
            ));
        }
        Ok(())
    }

    /// Eligible capital.
    #[must_use]
    pub const fn eligible_capital(&self) -> EurAmount {
        self.eligible_capital
    }

    /// Tier 1 capital.
    #[must_use]
    pub const fn tier1_capital(&self) -> EurAmount {
        self.tier1_capital
    }

    /// Date the figures refer to, if provided.
    #[must_use]
    pub const fn reference_date(&self) -> Option<NaiveDate> {
        self.reference_date
    }

    /// Returns true if the figures are consistent.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
    }

    /// Returns true if the reference date is within
    /// [`CAPITAL_VALIDITY_MONTHS`] before `as_of`.
    #[must_use]
    pub fn is_up_to_date(&self, as_of: NaiveDate) -> bool {
        let Some(reference) = self.reference_date else {
            return false;
        };
        if reference > as_of {
            return false;
        }
        reference
            .checked_add_months(Months::new(CAPITAL_VALIDITY_MONTHS))
            .is_some_and(|expiry| as_of <= expiry)
    }
}

impl Default for CapitalBaseParameters {
    /// Unset capital; must be provided before ratios can be computed.
    fn default() -> Self {
        Self {
            eligible_capital: EurAmount::ZERO,
            tier1_capital: EurAmount::ZERO,
            reference_date: None,
        }
    }
}

/// Portfolio concentration thresholds, expressed as percent HHI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcentrationRiskParameters {
    alert_threshold_percent: Decimal,
    attention_threshold_percent: Decimal,
}

impl ConcentrationRiskParameters {
    /// Create validated thresholds.
    ///
    /// # Errors
    ///
    /// Returns error unless `0 < attention < alert <= 100`.
    pub fn new(
        alert_threshold_percent: Decimal,
        attention_threshold_percent: Decimal,
    ) -> Result<Self, ParametersError> {
        let params = Self {
            alert_threshold_percent,
            attention_threshold_percent,
        };
        params.check()?;
        Ok(params)
    }

    fn check(&self) -> Result<(), ParametersError> {
        check_percent("concentration_alert_threshold_percent", self.alert_threshold_percent)?;
        check_percent(
            "concentration_attention_threshold_percent",
            self.attention_threshold_percent,
        )?;
        if self.attention_threshold_percent >= self.alert_threshold_percent {
            return Err(ParametersError::invalid(
                "concentration_attention_threshold_percent",
                "must be below the alert threshold",
            ));
        }
        Ok(())
    }

    /// HHI percent at or above which concentration is an alert.
    #[must_use]
    pub const fn alert_threshold_percent(&self) -> Decimal {
        self.alert_threshold_percent
    }

    /// HHI percent at or above which concentration needs attention.
    #[must_use]
    pub const fn attention_threshold_percent(&self) -> Decimal {
        self.attention_threshold_percent
    }

    /// Returns true if the thresholds are consistent.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
    }
}

impl Default for ConcentrationRiskParameters {
    fn default() -> Self {
        Self {
            alert_threshold_percent: dec!(25),
            attention_threshold_percent: dec!(15),
        }
    }
}

/// Outcome of the last parameter validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStatus {
    /// All parameter groups are consistent.
    pub bcbs239_compliant: bool,
    /// Capital figures are current.
    pub capital_up_to_date: bool,
}

impl ValidationStatus {
    /// Status of freshly created or reset parameters.
    #[must_use]
    pub const fn valid() -> Self {
        Self {
            bcbs239_compliant: true,
            capital_up_to_date: true,
        }
    }

    /// Returns true if both checks passed.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.bcbs239_compliant && self.capital_up_to_date
    }
}
