//! Compliance bounded context.
//!
//! Interprets a portfolio analysis against a bank's risk parameters:
//! large exposure limits and concentration thresholds.

pub mod service;
pub mod value_objects;

pub use service::{ComplianceService, concentration_status};
pub use value_objects::{
    ComplianceFinding, ComplianceVerdict, ConcentrationStatus, FindingSeverity,
    LargeExposureAssessment,
};
