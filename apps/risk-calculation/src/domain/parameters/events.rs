//! Risk parameters domain events.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{BankId, RiskParametersId, Timestamp};

/// Parameter group touched by an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterSection {
    /// Large exposure limits.
    LargeExposures,
    /// Capital base.
    CapitalBase,
    /// Concentration thresholds.
    ConcentrationRisk,
}

impl fmt::Display for ParameterSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LargeExposures => write!(f, "LARGE_EXPOSURES"),
            Self::CapitalBase => write!(f, "CAPITAL_BASE"),
            Self::ConcentrationRisk => write!(f, "CONCENTRATION_RISK"),
        }
    }
}

/// All risk parameters events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskParametersEvent {
    /// Parameters created with defaults.
    Created(RiskParametersCreated),
    /// One parameter group replaced.
    Updated(RiskParametersUpdated),
    /// All groups reset to defaults.
    Reset(RiskParametersReset),
}

impl RiskParametersEvent {
    /// Bank the parameters belong to.
    #[must_use]
    pub const fn bank_id(&self) -> &BankId {
        match self {
            Self::Created(e) => &e.bank_id,
            Self::Updated(e) => &e.bank_id,
            Self::Reset(e) => &e.bank_id,
        }
    }

    /// When the event occurred.
    #[must_use]
    pub const fn occurred_at(&self) -> Timestamp {
        match self {
            Self::Created(e) => e.occurred_at,
            Self::Updated(e) => e.occurred_at,
            Self::Reset(e) => e.occurred_at,
        }
    }

    /// Event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Created(_) => "RISK_PARAMETERS_CREATED",
            Self::Updated(_) => "RISK_PARAMETERS_UPDATED",
            Self::Reset(_) => "RISK_PARAMETERS_RESET",
        }
    }
}

/// Event: parameters created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskParametersCreated {
    /// Parameters ID.
    pub parameters_id: RiskParametersId,
    /// Bank ID.
    pub bank_id: BankId,
    /// Who created them.
    pub created_by: String,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: a parameter group was updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskParametersUpdated {
    /// Parameters ID.
    pub parameters_id: RiskParametersId,
    /// Bank ID.
    pub bank_id: BankId,
    /// Group that changed.
    pub section: ParameterSection,
    /// Who changed it.
    pub modified_by: String,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: parameters reset to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskParametersReset {
    /// Parameters ID.
    pub parameters_id: RiskParametersId,
    /// Bank ID.
    pub bank_id: BankId,
    /// Who reset them.
    pub modified_by: String,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}
