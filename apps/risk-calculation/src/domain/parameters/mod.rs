//! Risk parameters bounded context.
//!
//! A bank's large exposure limits, capital base and concentration thresholds,
//! loaded once per calculation and changed only through administrative
//! updates.

pub mod aggregate;
pub mod errors;
pub mod events;
pub mod repository;
pub mod value_objects;

pub use aggregate::{AuditInfo, RiskParameters};
pub use errors::ParametersError;
pub use events::{
    ParameterSection, RiskParametersCreated, RiskParametersEvent, RiskParametersReset,
    RiskParametersUpdated,
};
pub use repository::RiskParametersRepository;
pub use value_objects::{
    CAPITAL_VALIDITY_MONTHS, CapitalBaseParameters, ConcentrationRiskParameters,
    LargeExposuresParameters, ValidationStatus,
};
