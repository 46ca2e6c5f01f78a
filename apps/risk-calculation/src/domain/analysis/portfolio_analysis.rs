//! Portfolio analysis aggregate.

use serde::{Deserialize, Serialize};

use super::breakdown::Breakdown;
use super::categories::{GeographicRegion, SectorCategory};
use super::events::PortfolioAnalysisCompleted;
use super::hhi::{ConcentrationThresholds, Hhi};
use super::share::DEFAULT_PERCENTAGE_SCALE;
use super::totals::{CategoryTotals, ClassifiedExposure};
use crate::domain::shared::{BatchId, DomainError, EurAmount, Timestamp};

/// Settings applied when building breakdowns and HHIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisSettings {
    /// HHI level bands.
    pub thresholds: ConcentrationThresholds,
    /// Decimal places on share percentages.
    pub percentage_scale: u32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            thresholds: ConcentrationThresholds::default(),
            percentage_scale: DEFAULT_PERCENTAGE_SCALE,
        }
    }
}

/// Concentration analysis of one batch's net exposures.
///
/// Built once and never mutated; re-analysing a batch yields a new instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    batch_id: BatchId,
    total_portfolio_eur: EurAmount,
    total_exposures: usize,
    geographic_breakdown: Breakdown,
    sector_breakdown: Breakdown,
    geographic_hhi: Hhi,
    sector_hhi: Hhi,
    analyzed_at: Timestamp,
}

impl PortfolioAnalysis {
    /// Analyse classified exposures with default settings.
    ///
    /// # Errors
    ///
    /// Returns error if `batch_id` is blank or the totals overflow.
    pub fn analyze(
        batch_id: BatchId,
        exposures: &[ClassifiedExposure],
    ) -> Result<Self, DomainError> {
        Self::from_totals(
            batch_id,
            CategoryTotals::from_exposures(exposures)?,
            &AnalysisSettings::default(),
        )
    }

    /// Build the analysis from already accumulated category totals.
    ///
    /// # Errors
    ///
    /// Returns error if `batch_id` is blank or a category sum overflows.
    pub fn from_totals(
        batch_id: BatchId,
        totals: CategoryTotals,
        settings: &AnalysisSettings,
    ) -> Result<Self, DomainError> {
        if batch_id.is_blank() {
            return Err(DomainError::invalid("batch_id", "batch id cannot be blank"));
        }

        let total = totals.total();
        let geographic_breakdown = Breakdown::from_amounts_scaled(
            totals.by_region().iter().map(|(r, a)| (*r, a.amount)),
            total,
            settings.percentage_scale,
        )?;
        let sector_breakdown = Breakdown::from_amounts_scaled(
            totals.by_sector().iter().map(|(s, a)| (*s, a.amount)),
            total,
            settings.percentage_scale,
        )?;
        let geographic_hhi = Hhi::calculate_with(&geographic_breakdown, &settings.thresholds);
        let sector_hhi = Hhi::calculate_with(&sector_breakdown, &settings.thresholds);

        Ok(Self {
            batch_id,
            total_portfolio_eur: total,
            total_exposures: totals.exposure_count(),
            geographic_breakdown,
            sector_breakdown,
            geographic_hhi,
            sector_hhi,
            analyzed_at: Timestamp::now(),
        })
    }

    /// Batch identifier.
    #[must_use]
    pub const fn batch_id(&self) -> &BatchId {
        &self.batch_id
    }

    /// Total net portfolio in EUR.
    #[must_use]
    pub const fn total_portfolio_eur(&self) -> EurAmount {
        self.total_portfolio_eur
    }

    /// Number of exposures analysed.
    #[must_use]
    pub const fn total_exposures(&self) -> usize {
        self.total_exposures
    }

    /// Distribution by region.
    #[must_use]
    pub const fn geographic_breakdown(&self) -> &Breakdown {
        &self.geographic_breakdown
    }

    /// Distribution by sector.
    #[must_use]
    pub const fn sector_breakdown(&self) -> &Breakdown {
        &self.sector_breakdown
    }

    /// Geographic concentration.
    #[must_use]
    pub const fn geographic_hhi(&self) -> Hhi {
        self.geographic_hhi
    }

    /// Sector concentration.
    #[must_use]
    pub const fn sector_hhi(&self) -> Hhi {
        self.sector_hhi
    }

    /// When the analysis was built.
    #[must_use]
    pub const fn analyzed_at(&self) -> Timestamp {
        self.analyzed_at
    }

    /// Share amount for a region, zero if absent.
    #[must_use]
    pub fn region_amount(&self, region: GeographicRegion) -> EurAmount {
        self.geographic_breakdown
            .get_share(region.as_str())
            .map_or(EurAmount::ZERO, |s| s.amount())
    }

    /// Share amount for a sector, zero if absent.
    #[must_use]
    pub fn sector_amount(&self, sector: SectorCategory) -> EurAmount {
        self.sector_breakdown
            .get_share(sector.as_str())
            .map_or(EurAmount::ZERO, |s| s.amount())
    }

    /// Completion payload for publishing.
    #[must_use]
    pub fn completion_event(&self) -> PortfolioAnalysisCompleted {
        PortfolioAnalysisCompleted {
            batch_id: self.batch_id.clone(),
            total_portfolio_eur: self.total_portfolio_eur,
            geographic_hhi: self.geographic_hhi.value(),
            sector_hhi: self.sector_hhi.value(),
            completed_at: self.analyzed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::ConcentrationLevel;
    use crate::domain::protection::ProtectedExposure;
    use crate::domain::shared::ExposureId;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn exposure(
        id: &str,
        net: u64,
        region: GeographicRegion,
        sector: SectorCategory,
    ) -> ClassifiedExposure {
        ClassifiedExposure::new(
            ProtectedExposure::without_mitigations(ExposureId::new(id), EurAmount::from_units(net))
                .unwrap(),
            region,
            sector,
        )
    }

    fn sample() -> Vec<ClassifiedExposure> {
        vec![
            exposure("E1", 250, GeographicRegion::Italy, SectorCategory::RetailMortgage),
            exposure("E2", 250, GeographicRegion::Italy, SectorCategory::Sovereign),
            exposure("E3", 250, GeographicRegion::EuOther, SectorCategory::Corporate),
            exposure("E4", 250, GeographicRegion::NonEuropean, SectorCategory::Banking),
        ]
    }

    #[test]
    fn analyze_builds_breakdowns_and_hhis() {
        let analysis = PortfolioAnalysis::analyze(BatchId::new("BATCH-1"), &sample()).unwrap();

        assert_eq!(analysis.total_portfolio_eur(), EurAmount::from_units(1000));
        assert_eq!(analysis.total_exposures(), 4);

        let italy = analysis.geographic_breakdown().get_share("ITALY").unwrap();
        assert_eq!(italy.percentage(), dec!(50.0000));
        // 0.5^2 + 0.25^2 + 0.25^2
        assert_eq!(analysis.geographic_hhi().value(), dec!(0.375));
        assert_eq!(analysis.geographic_hhi().level(), ConcentrationLevel::High);

        assert_eq!(analysis.sector_breakdown().len(), 4);
        assert_eq!(analysis.sector_hhi().value(), dec!(0.25));
        assert_eq!(analysis.sector_hhi().level(), ConcentrationLevel::High);
        assert_eq!(analysis.region_amount(GeographicRegion::Italy), EurAmount::from_units(500));
        assert_eq!(analysis.sector_amount(SectorCategory::Other), EurAmount::ZERO);
    }

    #[test]
    fn empty_portfolio_has_zero_indices() {
        let analysis = PortfolioAnalysis::analyze(BatchId::new("BATCH-EMPTY"), &[]).unwrap();

        assert_eq!(analysis.total_portfolio_eur(), EurAmount::ZERO);
        assert!(analysis.geographic_breakdown().is_empty());
        assert_eq!(analysis.geographic_hhi().value(), Decimal::ZERO);
        assert_eq!(analysis.sector_hhi().level(), ConcentrationLevel::Low);
    }

    #[test]
    fn fully_covered_exposures_keep_zero_share() {
        let exposures = vec![
            exposure("E1", 1000, GeographicRegion::Italy, SectorCategory::Corporate),
            exposure("E2", 0, GeographicRegion::EuOther, SectorCategory::Banking),
        ];
        let analysis = PortfolioAnalysis::analyze(BatchId::new("BATCH-2"), &exposures).unwrap();

        let eu = analysis.geographic_breakdown().get_share("EU_OTHER").unwrap();
        assert_eq!(eu.percentage(), Decimal::ZERO);
        assert_eq!(analysis.geographic_hhi().value(), Decimal::ONE);
    }

    #[test]
    fn from_totals_matches_analyze() {
        let exposures = sample();
        let mut totals = CategoryTotals::from_exposures(&exposures[..2]).unwrap();
        totals
            .merge(CategoryTotals::from_exposures(&exposures[2..]).unwrap())
            .unwrap();

        let merged = PortfolioAnalysis::from_totals(
            BatchId::new("BATCH-1"),
            totals,
            &AnalysisSettings::default(),
        )
        .unwrap();
        let direct = PortfolioAnalysis::analyze(BatchId::new("BATCH-1"), &exposures).unwrap();

        assert_eq!(merged.geographic_breakdown(), direct.geographic_breakdown());
        assert_eq!(merged.sector_hhi(), direct.sector_hhi());
    }

    #[test]
    fn custom_thresholds_change_levels() {
        let settings = AnalysisSettings {
            thresholds: ConcentrationThresholds::new(dec!(0.30), dec!(0.50)).unwrap(),
            percentage_scale: 2,
        };
        let analysis = PortfolioAnalysis::from_totals(
            BatchId::new("BATCH-1"),
            CategoryTotals::from_exposures(&sample()).unwrap(),
            &settings,
        )
        .unwrap();

        assert_eq!(analysis.geographic_hhi().level(), ConcentrationLevel::Moderate);
        assert_eq!(analysis.sector_hhi().level(), ConcentrationLevel::Low);
    }

    #[test]
    fn blank_batch_id_rejected() {
        assert!(PortfolioAnalysis::analyze(BatchId::new(""), &sample()).is_err());
    }

    #[test]
    fn completion_event_mirrors_analysis() {
        let analysis = PortfolioAnalysis::analyze(BatchId::new("BATCH-1"), &sample()).unwrap();
        let event = analysis.completion_event();

        assert_eq!(event.batch_id, *analysis.batch_id());
        assert_eq!(event.total_portfolio_eur, analysis.total_portfolio_eur());
        assert_eq!(event.geographic_hhi, dec!(0.375));
        assert_eq!(event.completed_at, analysis.analyzed_at());
    }
}
