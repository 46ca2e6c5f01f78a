//! EUR amount value object for the reporting currency.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::domain::shared::DomainError;

/// A non-negative monetary amount in EUR, the fixed reporting currency.
///
/// Construction rejects negative values, so every `EurAmount` in the system
/// satisfies `value >= 0`. Subtraction is only offered as
/// [`EurAmount::saturating_sub`], which floors at zero. Addition is only
/// offered as [`EurAmount::checked_add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct EurAmount(Decimal);

impl EurAmount {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new EUR amount.
    ///
    /// # Errors
    ///
    /// Returns error if `value` is negative.
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::invalid(
                "eur_amount",
                "EUR amount cannot be negative",
            ));
        }
        Ok(Self(value))
    }

    /// Create from a whole number of euros.
    #[must_use]
    pub fn from_units(units: u64) -> Self {
        Self(Decimal::from(units))
    }

    /// Zero amount.
    #[must_use]
    pub const fn zero() -> Self {
        Self::ZERO
    }

    /// Get the inner Decimal value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if this amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if this amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Subtract `other`, flooring the result at zero.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        if other.0 >= self.0 {
            Self::ZERO
        } else {
            Self(self.0 - other.0)
        }
    }

    /// Add `other`.
    ///
    /// # Errors
    ///
    /// Returns error if the sum exceeds the representable range.
    pub fn checked_add(self, other: Self) -> Result<Self, DomainError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or_else(|| DomainError::invalid("eur_amount", "EUR amount overflow"))
    }

    /// Sum `amounts`, failing on overflow.
    ///
    /// # Errors
    ///
    /// Returns error if the running total exceeds the representable range.
    pub fn try_sum<I>(amounts: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = Self>,
    {
        amounts.into_iter().try_fold(Self::ZERO, Self::checked_add)
    }

    /// Round to cents using HALF_UP.
    #[must_use]
    pub fn round_cents(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl Default for EurAmount {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for EurAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EUR {:.2}", self.0)
    }
}

impl PartialOrd for EurAmount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EurAmount {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl TryFrom<Decimal> for EurAmount {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EurAmount> for Decimal {
    fn from(value: EurAmount) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn eur_amount_accepts_positive_and_zero() {
        assert_eq!(EurAmount::new(dec!(1000.50)).unwrap().value(), dec!(1000.50));
        assert!(EurAmount::new(Decimal::ZERO).unwrap().is_zero());
    }

    #[test]
    fn eur_amount_rejects_negative() {
        let err = EurAmount::new(dec!(-100)).unwrap_err();
        assert!(err.to_string().contains("EUR amount cannot be negative"));
    }

    #[test]
    fn eur_amount_accepts_negative_zero() {
        let negative_zero = -Decimal::ZERO;
        assert!(EurAmount::new(negative_zero).is_ok());
    }

    #[test]
    fn eur_amount_saturating_sub_floors_at_zero() {
        let gross = EurAmount::from_units(50_000);
        let cover = EurAmount::from_units(80_000);
        assert_eq!(gross.saturating_sub(cover), EurAmount::ZERO);
        assert_eq!(cover.saturating_sub(gross), EurAmount::from_units(30_000));
    }

    #[test]
    fn eur_amount_try_sum() {
        let amounts = [EurAmount::from_units(20_000), EurAmount::from_units(30_000)];
        let total = EurAmount::try_sum(amounts).unwrap();
        assert_eq!(total, EurAmount::from_units(50_000));

        let empty = EurAmount::try_sum(std::iter::empty()).unwrap();
        assert!(empty.is_zero());
    }

    #[test]
    fn eur_amount_add_overflow_is_error() {
        let max = EurAmount::new(Decimal::MAX).unwrap();
        let err = max.checked_add(EurAmount::from_units(1)).unwrap_err();
        assert!(err.to_string().contains("EUR amount overflow"));

        assert!(EurAmount::try_sum([max, max]).is_err());
        assert_eq!(max.checked_add(EurAmount::ZERO).unwrap(), max);
    }

    #[test]
    fn eur_amount_round_cents_half_up() {
        let amount = EurAmount::new(dec!(150.555)).unwrap();
        assert_eq!(amount.round_cents().value(), dec!(150.56));
    }

    #[test]
    fn eur_amount_display() {
        let amount = EurAmount::new(dec!(1234.5)).unwrap();
        assert_eq!(format!("{amount}"), "EUR 1234.50");
    }

    #[test]
    fn eur_amount_ordering() {
        let a = EurAmount::from_units(100);
        let b = EurAmount::from_units(50);
        assert!(a > b);
        assert_eq!(a.max(b), a);
    }

    #[test]
    fn eur_amount_serde_rejects_negative() {
        let parsed: Result<EurAmount, _> = serde_json::from_str("\"-5\"");
        assert!(parsed.is_err());

        let amount = EurAmount::new(dec!(150.50)).unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        let back: EurAmount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }
}
