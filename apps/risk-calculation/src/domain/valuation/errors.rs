//! Valuation errors.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::shared::{CurrencyPair, DomainError};

/// Errors raised while looking up rates or converting amounts to EUR.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValuationError {
    /// The provider has no rate for the pair on the requested date.
    #[error("Exchange rate unavailable for {pair} on {date}: {reason}")]
    RateUnavailable {
        /// Requested pair.
        pair: CurrencyPair,
        /// Requested date.
        date: NaiveDate,
        /// Provider-supplied reason.
        reason: String,
    },

    /// The provider returned a rate that cannot be used.
    #[error("Invalid exchange rate for {pair}: {message}")]
    InvalidRate {
        /// Pair the rate was returned for.
        pair: CurrencyPair,
        /// Error message.
        message: String,
    },

    /// Input data failed validation.
    #[error(transparent)]
    InvalidInput(#[from] DomainError),
}

impl ValuationError {
    /// Returns true if this is a rate-unavailable failure.
    #[must_use]
    pub const fn is_rate_unavailable(&self) -> bool {
        matches!(self, Self::RateUnavailable { .. })
    }
}
