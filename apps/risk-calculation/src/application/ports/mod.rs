//! Application Ports (Driven)
//!
//! Interfaces the calculation uses to reach storage, event consumers and
//! rate sources. The risk parameters repository and the exchange rate
//! provider are defined next to their aggregates in the domain layer and
//! re-exported here.

mod analysis_repository_port;
mod event_publisher_port;

pub use analysis_repository_port::{
    AnalysisRepositoryPort, InMemoryAnalysisRepository, RepositoryError,
};
pub use event_publisher_port::{EventPublishError, EventPublisherPort, NoOpEventPublisher};

pub use crate::domain::parameters::RiskParametersRepository;
pub use crate::domain::valuation::ExchangeRateProvider;
