//! Compliance interpretation service.
//!
//! Reads a finished [`PortfolioAnalysis`] and the netted exposures against a
//! bank's [`RiskParameters`]. Neither input is modified.

use rust_decimal::{Decimal, RoundingStrategy};

use super::value_objects::{
    ComplianceFinding, ComplianceVerdict, ConcentrationStatus, LargeExposureAssessment,
};
use crate::domain::analysis::{Hhi, PortfolioAnalysis};
use crate::domain::parameters::{ConcentrationRiskParameters, RiskParameters};
use crate::domain::protection::ProtectedExposure;
use crate::domain::shared::{EurAmount, Timestamp};

const RATIO_SCALE: u32 = 4;

/// Evaluates a batch against one bank's risk parameters.
#[derive(Debug, Clone, Copy)]
pub struct ComplianceService<'a> {
    parameters: &'a RiskParameters,
}

impl<'a> ComplianceService<'a> {
    /// Create a service over `parameters`.
    #[must_use]
    pub const fn new(parameters: &'a RiskParameters) -> Self {
        Self { parameters }
    }

    /// Produce the verdict for one batch.
    #[must_use]
    pub fn evaluate<'e, I>(&self, analysis: &PortfolioAnalysis, exposures: I) -> ComplianceVerdict
    where
        I: IntoIterator<Item = &'e ProtectedExposure>,
    {
        let mut findings = Vec::new();
        let concentration = self.parameters.concentration_risk();

        let geographic_status = concentration_status(analysis.geographic_hhi(), concentration);
        let sector_status = concentration_status(analysis.sector_hhi(), concentration);
        push_concentration_finding(
            &mut findings,
            "geographic",
            analysis.geographic_hhi(),
            geographic_status,
            concentration,
        );
        push_concentration_finding(
            &mut findings,
            "sector",
            analysis.sector_hhi(),
            sector_status,
            concentration,
        );

        let large_exposures = self.assess_large_exposures(exposures, &mut findings);

        ComplianceVerdict {
            bank_id: self.parameters.bank_id().clone(),
            batch_id: analysis.batch_id().clone(),
            geographic_status,
            sector_status,
            large_exposures,
            findings,
            evaluated_at: Timestamp::now(),
        }
    }

    fn assess_large_exposures<'e, I>(
        &self,
        exposures: I,
        findings: &mut Vec<ComplianceFinding>,
    ) -> Vec<LargeExposureAssessment>
    where
        I: IntoIterator<Item = &'e ProtectedExposure>,
    {
        let limits = self.parameters.large_exposures();
        let eligible_capital = self.parameters.capital_base().eligible_capital();

        if !eligible_capital.is_positive() {
            findings.push(ComplianceFinding::critical(
                "CAPITAL_BASE_MISSING",
                "eligible capital is not set; large exposures cannot be assessed",
            ));
            return Vec::new();
        }

        let mut assessments: Vec<LargeExposureAssessment> = exposures
            .into_iter()
            .filter_map(|exposure| {
                let percent = percent_of(exposure.net_exposure(), eligible_capital);
                (percent >= limits.classification_threshold_percent()).then(|| {
                    LargeExposureAssessment {
                        exposure_id: exposure.exposure_id().clone(),
                        net_exposure: exposure.net_exposure(),
                        percent_of_capital: percent,
                        is_breach: percent > limits.limit_percent(),
                    }
                })
            })
            .collect();
        assessments.sort_by(|a, b| {
            b.percent_of_capital
                .cmp(&a.percent_of_capital)
                .then_with(|| a.exposure_id.cmp(&b.exposure_id))
        });

        for breach in assessments.iter().filter(|a| a.is_breach) {
            findings.push(
                ComplianceFinding::critical(
                    "LARGE_EXPOSURE_LIMIT_BREACH",
                    format!(
                        "net exposure is {}% of eligible capital",
                        breach.percent_of_capital
                    ),
                )
                .with_exposure(breach.exposure_id.clone())
                .with_observed(breach.percent_of_capital.to_string())
                .with_limit(limits.limit_percent().to_string()),
            );
        }

        let max = limits.max_large_exposures() as usize;
        if assessments.len() > max {
            findings.push(
                ComplianceFinding::error(
                    "LARGE_EXPOSURE_COUNT_EXCEEDED",
                    format!("{} large exposures, at most {max} allowed", assessments.len()),
                )
                .with_observed(assessments.len().to_string())
                .with_limit(max.to_string()),
            );
        }

        assessments
    }
}

/// Status of an HHI against the bank's alert and attention thresholds.
#[must_use]
pub fn concentration_status(
    hhi: Hhi,
    parameters: &ConcentrationRiskParameters,
) -> ConcentrationStatus {
    let percent = hhi.value() * Decimal::ONE_HUNDRED;
    if percent >= parameters.alert_threshold_percent() {
        ConcentrationStatus::Alert
    } else if percent >= parameters.attention_threshold_percent() {
        ConcentrationStatus::Attention
    } else {
        ConcentrationStatus::Compliant
    }
}

fn push_concentration_finding(
    findings: &mut Vec<ComplianceFinding>,
    dimension: &str,
    hhi: Hhi,
    status: ConcentrationStatus,
    parameters: &ConcentrationRiskParameters,
) {
    let observed = (hhi.value() * Decimal::ONE_HUNDRED).normalize().to_string();
    let finding = match status {
        ConcentrationStatus::Compliant => return,
        ConcentrationStatus::Attention => ComplianceFinding::warning(
            "CONCENTRATION_ATTENTION",
            format!("{dimension} HHI requires attention"),
        )
        .with_limit(parameters.attention_threshold_percent().to_string()),
        ConcentrationStatus::Alert => ComplianceFinding::error(
            "CONCENTRATION_ALERT",
            format!("{dimension} HHI is at or above the alert threshold"),
        )
        .with_limit(parameters.alert_threshold_percent().to_string()),
    };
    findings.push(finding.with_observed(observed));
}

/// `amount` as a percentage of a positive `base`, saturating at `Decimal::MAX`.
fn percent_of(amount: EurAmount, base: EurAmount) -> Decimal {
    amount
        .value()
        .checked_div(base.value())
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(Decimal::MAX, |percent| {
            percent.round_dp_with_strategy(RATIO_SCALE, RoundingStrategy::MidpointAwayFromZero)
        })
}
