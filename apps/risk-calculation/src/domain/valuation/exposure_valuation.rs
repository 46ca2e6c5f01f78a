//! Gross exposure valuation in EUR.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::ValuationError;
use super::exchange_rate::ExchangeRate;
use super::provider::RateSource;
use crate::domain::shared::{CurrencyCode, DomainError, EurAmount, ExposureId};

/// An exposure's gross amount converted to EUR, with the rate applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposureValuation {
    exposure_id: ExposureId,
    original_amount: Decimal,
    original_currency: CurrencyCode,
    rate: ExchangeRate,
    eur_amount: EurAmount,
}

impl ExposureValuation {
    /// Convert `amount` in `currency` to EUR through the session rates.
    ///
    /// # Errors
    ///
    /// Returns error if the amount is negative or the rate is unavailable.
    pub fn convert(
        exposure_id: ExposureId,
        amount: Decimal,
        currency: CurrencyCode,
        rates: &mut impl RateSource,
    ) -> Result<Self, ValuationError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::invalid(
                "gross_amount",
                format!("exposure {exposure_id} has negative amount {amount}"),
            )
            .into());
        }
        let rate = rates.rate(&currency, &CurrencyCode::eur())?;
        let eur_amount = rate.convert_to_eur(amount)?;
        Ok(Self {
            exposure_id,
            original_amount: amount,
            original_currency: currency,
            rate,
            eur_amount,
        })
    }

    /// Exposure identifier.
    #[must_use]
    pub const fn exposure_id(&self) -> &ExposureId {
        &self.exposure_id
    }

    /// Amount in the original currency.
    #[must_use]
    pub const fn original_amount(&self) -> Decimal {
        self.original_amount
    }

    /// Original currency.
    #[must_use]
    pub const fn original_currency(&self) -> &CurrencyCode {
        &self.original_currency
    }

    /// Rate used for the conversion.
    #[must_use]
    pub const fn rate(&self) -> &ExchangeRate {
        &self.rate
    }

    /// Gross amount in EUR.
    #[must_use]
    pub const fn eur_amount(&self) -> EurAmount {
        self.eur_amount
    }
}
