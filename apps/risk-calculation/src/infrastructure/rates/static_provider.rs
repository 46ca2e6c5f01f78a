//! Exchange rate provider backed by a fixed rate table.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::shared::{CurrencyCode, CurrencyPair};
use crate::domain::valuation::{ExchangeRate, ExchangeRateProvider, ValuationError};

/// Serves rates from a table set up front, the same for every date.
///
/// Pairs missing from the table fail with `RateUnavailable`; no inverse or
/// cross rate is derived.
#[derive(Debug, Clone, Default)]
pub struct StaticExchangeRateProvider {
    rates: HashMap<CurrencyPair, Decimal>,
}

impl StaticExchangeRateProvider {
    /// Create an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rate for `from -> to`.
    #[must_use]
    pub fn with_rate(mut self, from: CurrencyCode, to: CurrencyCode, rate: Decimal) -> Self {
        self.rates.insert(CurrencyPair::new(from, to), rate);
        self
    }

    /// Number of pairs in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Check if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl ExchangeRateProvider for StaticExchangeRateProvider {
    fn get_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        date: NaiveDate,
    ) -> Result<ExchangeRate, ValuationError> {
        let pair = CurrencyPair::new(from.clone(), to.clone());
        match self.rates.get(&pair) {
            Some(rate) => ExchangeRate::new(*rate, from.clone(), to.clone(), date),
            None => Err(ValuationError::RateUnavailable {
                pair,
                date,
                reason: "pair not in rate table".to_string(),
            }),
        }
    }
}
