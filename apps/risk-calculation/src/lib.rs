// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Risk Calculation - Rust Core Library
//!
//! Credit-exposure netting and portfolio concentration analysis for bank
//! reporting batches.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic (aggregates, value objects, domain events)
//!   - `valuation`: Exchange rates and the per-batch rate cache
//!   - `protection`: Mitigations and exposure netting
//!   - `analysis`: Shares, breakdowns, HHI, `PortfolioAnalysis`
//!   - `classification`: Country to geographic region
//!   - `parameters`: The `RiskParameters` aggregate
//!   - `compliance`: Interpretation against risk parameters
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: Interfaces for storage, events and rates
//!   - `use_cases`: `CalculateRiskMetrics`
//!   - `dto`: Calculation requests and result documents
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `persistence`: Risk parameters repository
//!   - `messaging`: Event publisher
//!   - `rates`: Static exchange rate provider

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Configuration & Observability
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports from Clean Architecture
// =============================================================================

// Domain re-exports
pub use domain::analysis::{
    Breakdown, ConcentrationLevel, GeographicRegion, Hhi, PortfolioAnalysis, SectorCategory,
    Share,
};
pub use domain::compliance::{ComplianceService, ComplianceVerdict};
pub use domain::parameters::RiskParameters;
pub use domain::protection::{Mitigation, MitigationType, ProtectedExposure};
pub use domain::shared::{BankId, BatchId, CurrencyCode, DomainError, EurAmount, ExposureId};
pub use domain::valuation::{ExchangeRate, ExchangeRateCache, ExchangeRateProvider};

// Application re-exports
pub use application::dto::{
    CalculationRequestDto, CalculationResultsDocument, ExposureRecordDto, MitigationDto,
    PortfolioAnalysisSummary,
};
pub use application::ports::{
    AnalysisRepositoryPort, EventPublisherPort, InMemoryAnalysisRepository, NoOpEventPublisher,
    RiskParametersRepository,
};
pub use application::use_cases::{
    CalculateRiskMetricsUseCase, CalculationError, CalculationOptions, CalculationOutcome,
};

// Infrastructure re-exports
pub use infrastructure::{
    InMemoryEventPublisher, InMemoryRiskParametersRepository, StaticExchangeRateProvider,
};
