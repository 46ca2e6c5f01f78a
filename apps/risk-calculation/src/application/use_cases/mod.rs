//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod calculate_risk_metrics;

pub use calculate_risk_metrics::{
    CalculateRiskMetricsUseCase, CalculationError, CalculationOptions, CalculationOutcome,
    SkippedExposure,
};
