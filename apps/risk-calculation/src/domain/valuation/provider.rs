//! Exchange rate lookup ports.

use chrono::NaiveDate;

use super::errors::ValuationError;
use super::exchange_rate::ExchangeRate;
use crate::domain::shared::CurrencyCode;

/// External source of exchange rates.
///
/// Implementations may perform I/O and may fail; callers never receive a
/// defaulted rate in place of an error.
pub trait ExchangeRateProvider: Send + Sync {
    /// Rate converting one unit of `from` into `to` on `date`.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::RateUnavailable`] when no rate is known.
    fn get_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        date: NaiveDate,
    ) -> Result<ExchangeRate, ValuationError>;
}

impl<F> ExchangeRateProvider for F
where
    F: Fn(&CurrencyCode, &CurrencyCode, NaiveDate) -> Result<ExchangeRate, ValuationError>
        + Send
        + Sync,
{
    fn get_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        date: NaiveDate,
    ) -> Result<ExchangeRate, ValuationError> {
        self(from, to, date)
    }
}

/// Session-scoped rate lookup used during netting.
///
/// Implemented by [`super::ExchangeRateCache`] for single-owner use and by
/// [`super::SharedExchangeRateCache`] when several workers share one cache.
pub trait RateSource {
    /// Rate converting `from` into `to` for the current session.
    ///
    /// # Errors
    ///
    /// Propagates provider failures unchanged.
    fn rate(&mut self, from: &CurrencyCode, to: &CurrencyCode)
    -> Result<ExchangeRate, ValuationError>;
}
