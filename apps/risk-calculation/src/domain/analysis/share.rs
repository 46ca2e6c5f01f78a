//! Percentage-of-total share.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::shared::EurAmount;

/// Decimal places kept on share percentages.
pub const DEFAULT_PERCENTAGE_SCALE: u32 = 4;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// An amount and its percentage of a portfolio total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    amount: EurAmount,
    percentage: Decimal,
}

impl Share {
    /// Share of `amount` in `total`, percentage rounded HALF_UP to 4 places.
    ///
    /// A zero total yields a zero share. `amount` is expected to be part of
    /// `total`.
    #[must_use]
    pub fn calculate(amount: EurAmount, total: EurAmount) -> Self {
        Self::calculate_scaled(amount, total, DEFAULT_PERCENTAGE_SCALE)
    }

    /// Same as [`Share::calculate`] with an explicit percentage scale.
    #[must_use]
    pub fn calculate_scaled(amount: EurAmount, total: EurAmount, scale: u32) -> Self {
        if total.is_zero() {
            return Self::zero();
        }
        let percentage = (amount.value() / total.value() * HUNDRED)
            .round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
        Self { amount, percentage }
    }

    /// Zero amount, zero percent.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            amount: EurAmount::ZERO,
            percentage: Decimal::ZERO,
        }
    }

    /// Amount in EUR.
    #[must_use]
    pub const fn amount(&self) -> EurAmount {
        self.amount
    }

    /// Percentage in `[0, 100]`.
    #[must_use]
    pub const fn percentage(&self) -> Decimal {
        self.percentage
    }

    /// Percentage as a fraction in `[0, 1]`.
    #[must_use]
    pub fn decimal_share(&self) -> Decimal {
        self.percentage / HUNDRED
    }
}
