//! Valuation bounded context.
//!
//! Exchange rates, the external rate provider port and the per-batch cache
//! used to bring every amount into EUR.

pub mod cache;
pub mod errors;
pub mod exchange_rate;
pub mod exposure_valuation;
pub mod provider;

pub use cache::{CacheStatistics, ExchangeRateCache, SharedExchangeRateCache};
pub use errors::ValuationError;
pub use exchange_rate::ExchangeRate;
pub use exposure_valuation::ExposureValuation;
pub use provider::{ExchangeRateProvider, RateSource};
