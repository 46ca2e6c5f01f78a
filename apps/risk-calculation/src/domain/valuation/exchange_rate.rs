//! Exchange rate value object.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::errors::ValuationError;
use crate::domain::shared::{CurrencyCode, CurrencyPair, DomainError, EurAmount};

/// Scale applied to converted amounts.
pub const CONVERSION_SCALE: u32 = 2;

/// A rate for converting one unit of `from` into `to` on `as_of`.
///
/// `amount_in_to = amount_in_from * rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    rate: Decimal,
    from: CurrencyCode,
    to: CurrencyCode,
    as_of: NaiveDate,
}

impl ExchangeRate {
    /// Create a new exchange rate.
    ///
    /// # Errors
    ///
    /// Returns error if `rate` is not strictly positive.
    pub fn new(
        rate: Decimal,
        from: CurrencyCode,
        to: CurrencyCode,
        as_of: NaiveDate,
    ) -> Result<Self, ValuationError> {
        if rate <= Decimal::ZERO {
            return Err(ValuationError::InvalidRate {
                pair: CurrencyPair::new(from, to),
                message: format!("rate must be positive, got {rate}"),
            });
        }
        Ok(Self {
            rate,
            from,
            to,
            as_of,
        })
    }

    /// Identity rate for a currency onto itself.
    #[must_use]
    pub fn identity(currency: CurrencyCode, as_of: NaiveDate) -> Self {
        Self {
            rate: Decimal::ONE,
            from: currency.clone(),
            to: currency,
            as_of,
        }
    }

    /// The rate.
    #[must_use]
    pub const fn rate(&self) -> Decimal {
        self.rate
    }

    /// Source currency.
    #[must_use]
    pub const fn from(&self) -> &CurrencyCode {
        &self.from
    }

    /// Target currency.
    #[must_use]
    pub const fn to(&self) -> &CurrencyCode {
        &self.to
    }

    /// Rate date.
    #[must_use]
    pub const fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// The pair this rate converts.
    #[must_use]
    pub fn pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.from.clone(), self.to.clone())
    }

    /// Returns true for an identity rate.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }

    /// Convert an amount expressed in `from`, rounded HALF_UP to cents.
    ///
    /// # Errors
    ///
    /// Returns error if the converted amount overflows.
    pub fn convert(&self, amount: Decimal) -> Result<Decimal, ValuationError> {
        if self.is_identity() {
            return Ok(amount);
        }
        amount
            .checked_mul(self.rate)
            .map(|converted| {
                converted
                    .round_dp_with_strategy(CONVERSION_SCALE, RoundingStrategy::MidpointAwayFromZero)
            })
            .ok_or_else(|| {
                DomainError::invalid(
                    "amount",
                    format!("{amount} {} overflows at rate {}", self.from, self.rate),
                )
                .into()
            })
    }

    /// Convert a non-negative amount into EUR.
    ///
    /// # Errors
    ///
    /// Returns error if this rate does not target EUR, the amount is negative
    /// or the conversion overflows.
    pub fn convert_to_eur(&self, amount: Decimal) -> Result<EurAmount, ValuationError> {
        if !self.to.is_eur() {
            return Err(ValuationError::InvalidRate {
                pair: self.pair(),
                message: "rate does not target EUR".to_string(),
            });
        }
        Ok(EurAmount::new(self.convert(amount)?)?)
    }
}
