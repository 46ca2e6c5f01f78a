//! Shared Value Objects
//!
//! Immutable domain types used across bounded contexts.
//! Value objects are compared by value, not identity.

mod currency;
mod eur_amount;
mod identifiers;
mod timestamp;

pub use currency::{CurrencyCode, CurrencyPair};
pub use eur_amount::EurAmount;
pub use identifiers::{BankId, BatchId, ExposureId, RiskParametersId};
pub use timestamp::Timestamp;
