//! Exchange rate provider adapters.

mod static_provider;

pub use static_provider::StaticExchangeRateProvider;
