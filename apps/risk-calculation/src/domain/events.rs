//! Events published across the risk calculation contexts.

use serde::{Deserialize, Serialize};

use super::analysis::PortfolioAnalysisCompleted;
use super::parameters::{
    RiskParametersCreated, RiskParametersEvent, RiskParametersReset, RiskParametersUpdated,
};
use super::shared::Timestamp;

/// All events handed to the event publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskCalculationEvent {
    /// Portfolio analysis built for a batch.
    PortfolioAnalysisCompleted(PortfolioAnalysisCompleted),
    /// Risk parameters created.
    RiskParametersCreated(RiskParametersCreated),
    /// Risk parameters updated.
    RiskParametersUpdated(RiskParametersUpdated),
    /// Risk parameters reset.
    RiskParametersReset(RiskParametersReset),
}

impl RiskCalculationEvent {
    /// When the event occurred.
    #[must_use]
    pub const fn occurred_at(&self) -> Timestamp {
        match self {
            Self::PortfolioAnalysisCompleted(e) => e.completed_at,
            Self::RiskParametersCreated(e) => e.occurred_at,
            Self::RiskParametersUpdated(e) => e.occurred_at,
            Self::RiskParametersReset(e) => e.occurred_at,
        }
    }

    /// Event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::PortfolioAnalysisCompleted(_) => "PORTFOLIO_ANALYSIS_COMPLETED",
            Self::RiskParametersCreated(_) => "RISK_PARAMETERS_CREATED",
            Self::RiskParametersUpdated(_) => "RISK_PARAMETERS_UPDATED",
            Self::RiskParametersReset(_) => "RISK_PARAMETERS_RESET",
        }
    }
}

impl From<PortfolioAnalysisCompleted> for RiskCalculationEvent {
    fn from(event: PortfolioAnalysisCompleted) -> Self {
        Self::PortfolioAnalysisCompleted(event)
    }
}

impl From<RiskParametersEvent> for RiskCalculationEvent {
    fn from(event: RiskParametersEvent) -> Self {
        match event {
            RiskParametersEvent::Created(e) => Self::RiskParametersCreated(e),
            RiskParametersEvent::Updated(e) => Self::RiskParametersUpdated(e),
            RiskParametersEvent::Reset(e) => Self::RiskParametersReset(e),
        }
    }
}
