//! Credit risk mitigations converted to EUR.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::shared::{CurrencyCode, DomainError, EurAmount};
use crate::domain::valuation::{RateSource, ValuationError};

/// Kind of credit risk mitigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MitigationType {
    /// Cash or securities pledged as collateral.
    FinancialCollateral,
    /// Third-party guarantee.
    Guarantee,
    /// Physical asset pledged as collateral.
    PhysicalAsset,
    /// Real estate mortgage.
    RealEstate,
}

impl MitigationType {
    /// Wire name of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FinancialCollateral => "FINANCIAL_COLLATERAL",
            Self::Guarantee => "GUARANTEE",
            Self::PhysicalAsset => "PHYSICAL_ASSET",
            Self::RealEstate => "REAL_ESTATE",
        }
    }
}

impl fmt::Display for MitigationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MitigationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FINANCIAL_COLLATERAL" => Ok(Self::FinancialCollateral),
            "GUARANTEE" => Ok(Self::Guarantee),
            "PHYSICAL_ASSET" => Ok(Self::PhysicalAsset),
            "REAL_ESTATE" => Ok(Self::RealEstate),
            other => Err(DomainError::invalid(
                "mitigation_type",
                format!("unknown mitigation type '{other}'"),
            )),
        }
    }
}

/// A mitigation whose value was converted to EUR once, at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mitigation {
    mitigation_type: MitigationType,
    eur_value: EurAmount,
    original_value: Decimal,
    original_currency: CurrencyCode,
}

impl Mitigation {
    /// Create a mitigation from its raw value, converting it to EUR.
    ///
    /// EUR values pass through unchanged.
    ///
    /// # Errors
    ///
    /// Returns error if `value` is negative, `currency` is not an ISO 4217
    /// code, or no rate is available for the currency.
    pub fn create(
        mitigation_type: MitigationType,
        value: Decimal,
        currency: &str,
        rates: &mut impl RateSource,
    ) -> Result<Self, ValuationError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::invalid(
                "mitigation_value",
                format!("{mitigation_type} value cannot be negative: {value}"),
            )
            .into());
        }
        let original_currency = CurrencyCode::new(currency)?;

        let eur_value = if original_currency.is_eur() {
            EurAmount::new(value)?
        } else {
            rates
                .rate(&original_currency, &CurrencyCode::eur())?
                .convert_to_eur(value)?
        };

        Ok(Self {
            mitigation_type,
            eur_value,
            original_value: value,
            original_currency,
        })
    }

    /// Mitigation type.
    #[must_use]
    pub const fn mitigation_type(&self) -> MitigationType {
        self.mitigation_type
    }

    /// Value in EUR.
    #[must_use]
    pub const fn eur_value(&self) -> EurAmount {
        self.eur_value
    }

    /// Value in the original currency.
    #[must_use]
    pub const fn original_value(&self) -> Decimal {
        self.original_value
    }

    /// Original currency.
    #[must_use]
    pub const fn original_currency(&self) -> &CurrencyCode {
        &self.original_currency
    }
}
