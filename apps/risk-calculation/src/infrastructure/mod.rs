//! Infrastructure Layer
//!
//! Adapters implementing the ports of the application and domain layers:
//!
//! - `persistence/`: Risk parameters storage with optimistic versioning
//! - `messaging/`: Event publishing
//! - `rates/`: Exchange rate providers
//!
//! The portfolio analysis repository used in tests lives next to its port.

pub mod messaging;
pub mod persistence;
pub mod rates;

pub use messaging::InMemoryEventPublisher;
pub use persistence::InMemoryRiskParametersRepository;
pub use rates::StaticExchangeRateProvider;
