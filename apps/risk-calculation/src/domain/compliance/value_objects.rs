//! Compliance verdict types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{BankId, BatchId, EurAmount, ExposureId, Timestamp};

/// Concentration status of one dimension against the bank's thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConcentrationStatus {
    /// Below the attention threshold.
    Compliant,
    /// At or above attention, below alert.
    Attention,
    /// At or above the alert threshold.
    Alert,
}

impl fmt::Display for ConcentrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compliant => write!(f, "COMPLIANT"),
            Self::Attention => write!(f, "ATTENTION"),
            Self::Alert => write!(f, "ALERT"),
        }
    }
}

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingSeverity {
    /// Needs attention, not a breach.
    Warning,
    /// Regulatory threshold exceeded.
    Error,
    /// Hard limit breached or result unreliable.
    Critical,
}

impl fmt::Display for FindingSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A single compliance finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceFinding {
    /// Finding code (e.g., "LARGE_EXPOSURE_LIMIT_BREACH").
    pub code: String,
    /// Severity.
    pub severity: FindingSeverity,
    /// Human-readable message.
    pub message: String,
    /// Exposure concerned, if any.
    pub exposure_id: Option<ExposureId>,
    /// Observed value.
    pub observed: Option<String>,
    /// Configured limit.
    pub limit: Option<String>,
}

impl ComplianceFinding {
    /// Create a new finding.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        severity: FindingSeverity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            severity,
            message: message.into(),
            exposure_id: None,
            observed: None,
            limit: None,
        }
    }

    /// Create a warning finding.
    #[must_use]
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, FindingSeverity::Warning, message)
    }

    /// Create an error finding.
    #[must_use]
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, FindingSeverity::Error, message)
    }

    /// Create a critical finding.
    #[must_use]
    pub fn critical(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, FindingSeverity::Critical, message)
    }

    /// Add exposure context.
    #[must_use]
    pub fn with_exposure(mut self, exposure_id: ExposureId) -> Self {
        self.exposure_id = Some(exposure_id);
        self
    }

    /// Add observed value.
    #[must_use]
    pub fn with_observed(mut self, value: impl Into<String>) -> Self {
        self.observed = Some(value.into());
        self
    }

    /// Add limit value.
    #[must_use]
    pub fn with_limit(mut self, value: impl Into<String>) -> Self {
        self.limit = Some(value.into());
        self
    }

    /// Returns true for ERROR and CRITICAL findings.
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        matches!(
            self.severity,
            FindingSeverity::Error | FindingSeverity::Critical
        )
    }
}

impl fmt::Display for ComplianceFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)?;
        if let Some(id) = &self.exposure_id {
            write!(f, " (exposure: {id})")?;
        }
        Ok(())
    }
}

/// One exposure at or above the large exposure classification threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LargeExposureAssessment {
    /// Exposure ID.
    pub exposure_id: ExposureId,
    /// Net amount in EUR.
    pub net_exposure: EurAmount,
    /// Net amount as percent of eligible capital.
    pub percent_of_capital: Decimal,
    /// Ratio exceeds the large exposure limit.
    pub is_breach: bool,
}

/// Interpretation of one batch against a bank's risk parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceVerdict {
    /// Bank evaluated.
    pub bank_id: BankId,
    /// Batch evaluated.
    pub batch_id: BatchId,
    /// Geographic concentration status.
    pub geographic_status: ConcentrationStatus,
    /// Sector concentration status.
    pub sector_status: ConcentrationStatus,
    /// Large exposures, largest first.
    pub large_exposures: Vec<LargeExposureAssessment>,
    /// All findings.
    pub findings: Vec<ComplianceFinding>,
    /// When the verdict was produced.
    pub evaluated_at: Timestamp,
}

impl ComplianceVerdict {
    /// Returns true if there are no blocking findings.
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        !self.findings.iter().any(ComplianceFinding::is_blocking)
    }

    /// Number of large exposures.
    #[must_use]
    pub fn large_exposure_count(&self) -> usize {
        self.large_exposures.len()
    }

    /// Large exposures over the limit.
    pub fn breaches(&self) -> impl Iterator<Item = &LargeExposureAssessment> {
        self.large_exposures.iter().filter(|a| a.is_breach)
    }

    /// Findings of a given severity.
    #[must_use]
    pub fn findings_with(&self, severity: FindingSeverity) -> Vec<&ComplianceFinding> {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .collect()
    }
}
