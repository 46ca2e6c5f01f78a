//! Calculation result DTOs
//!
//! The JSON results document handed to report generation and the flat
//! summary row used for tabular storage.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::analysis::{
    Breakdown, ClassifiedExposure, GeographicRegion, PortfolioAnalysis, SectorCategory, Share,
};
use crate::domain::shared::{BankId, EurAmount, Timestamp};
use crate::domain::valuation::ExposureValuation;

/// One exposure after valuation, netting and classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatedExposure {
    /// Gross valuation in EUR.
    pub valuation: ExposureValuation,
    /// Netted and classified exposure.
    pub classified: ClassifiedExposure,
    /// Counterparty country, if supplied.
    pub country_code: Option<String>,
}

/// Amount and percentage of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownEntryDto {
    /// Amount in EUR.
    pub amount_eur: Decimal,
    /// Percent of the portfolio.
    pub percentage: Decimal,
}

impl From<&Share> for BreakdownEntryDto {
    fn from(share: &Share) -> Self {
        Self {
            amount_eur: share.amount().value(),
            percentage: share.percentage(),
        }
    }
}

/// HHI values of both dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcentrationIndicesDto {
    /// Geographic HHI.
    pub herfindahl_geographic: Decimal,
    /// Sector HHI.
    pub herfindahl_sector: Decimal,
}

/// Portfolio-level section of the results document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsSummaryDto {
    /// Number of exposures.
    pub total_exposures: usize,
    /// Total net portfolio in EUR.
    pub total_amount_eur: Decimal,
    /// Geographic breakdown keyed by lowercase category.
    pub geographic_breakdown: BTreeMap<String, BreakdownEntryDto>,
    /// Sector breakdown keyed by lowercase category.
    pub sector_breakdown: BTreeMap<String, BreakdownEntryDto>,
    /// Concentration indices.
    pub concentration_indices: ConcentrationIndicesDto,
}

/// Per-exposure section of the results document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatedExposureDto {
    /// Exposure ID.
    pub exposure_id: String,
    /// Gross amount in the original currency.
    pub original_amount: Decimal,
    /// Original currency.
    pub original_currency: String,
    /// Gross amount in EUR.
    pub eur_amount: Decimal,
    /// Net amount in EUR after mitigation.
    pub mitigated_amount_eur: Decimal,
    /// Rate applied to the gross amount.
    pub exchange_rate_used: Decimal,
    /// Net amount as percent of the portfolio.
    pub percentage_of_total: Decimal,
    /// Counterparty country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Geographic region.
    pub geographic_region: GeographicRegion,
    /// Economic sector.
    pub economic_sector: SectorCategory,
}

impl CalculatedExposureDto {
    fn from_calculated(exposure: &CalculatedExposure, total: EurAmount) -> Self {
        let net = exposure.classified.net_amount();
        Self {
            exposure_id: exposure.valuation.exposure_id().to_string(),
            original_amount: exposure.valuation.original_amount(),
            original_currency: exposure.valuation.original_currency().to_string(),
            eur_amount: exposure.valuation.eur_amount().value(),
            mitigated_amount_eur: net.value(),
            exchange_rate_used: exposure.valuation.rate().rate(),
            percentage_of_total: Share::calculate(net, total).percentage(),
            country: exposure.country_code.clone(),
            geographic_region: exposure.classified.region,
            economic_sector: exposure.classified.sector,
        }
    }
}

/// Serialized result of one batch calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResultsDocument {
    /// Batch ID.
    pub batch_id: String,
    /// When the analysis was built.
    pub calculated_at: Timestamp,
    /// Bank ID.
    pub bank_id: String,
    /// Portfolio summary.
    pub summary: ResultsSummaryDto,
    /// Exposure detail.
    pub calculated_exposures: Vec<CalculatedExposureDto>,
}

impl CalculationResultsDocument {
    /// Build the document for one analysed batch.
    #[must_use]
    pub fn new(
        bank_id: &BankId,
        analysis: &PortfolioAnalysis,
        exposures: &[CalculatedExposure],
    ) -> Self {
        let total = analysis.total_portfolio_eur();
        Self {
            batch_id: analysis.batch_id().to_string(),
            calculated_at: analysis.analyzed_at(),
            bank_id: bank_id.to_string(),
            summary: ResultsSummaryDto {
                total_exposures: analysis.total_exposures(),
                total_amount_eur: total.value(),
                geographic_breakdown: lowercase_entries(analysis.geographic_breakdown()),
                sector_breakdown: lowercase_entries(analysis.sector_breakdown()),
                concentration_indices: ConcentrationIndicesDto {
                    herfindahl_geographic: analysis.geographic_hhi().value(),
                    herfindahl_sector: analysis.sector_hhi().value(),
                },
            },
            calculated_exposures: exposures
                .iter()
                .map(|e| CalculatedExposureDto::from_calculated(e, total))
                .collect(),
        }
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a document.
    ///
    /// # Errors
    ///
    /// Returns error if `json` is not a valid results document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn lowercase_entries(breakdown: &Breakdown) -> BTreeMap<String, BreakdownEntryDto> {
    breakdown
        .shares()
        .iter()
        .map(|(category, share)| (category.to_ascii_lowercase(), BreakdownEntryDto::from(share)))
        .collect()
}

/// Flat summary row of one portfolio analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioAnalysisSummary {
    /// Batch ID.
    pub batch_id: String,
    /// Total net portfolio in EUR.
    pub total_portfolio_eur: Decimal,
    /// Home country amount.
    pub italy_amount: Decimal,
    /// Home country percentage.
    pub italy_percentage: Decimal,
    /// Other EU amount.
    pub eu_other_amount: Decimal,
    /// Other EU percentage.
    pub eu_other_percentage: Decimal,
    /// Non-European amount.
    pub non_european_amount: Decimal,
    /// Non-European percentage.
    pub non_european_percentage: Decimal,
    /// Retail mortgage amount.
    pub retail_mortgage_amount: Decimal,
    /// Retail mortgage percentage.
    pub retail_mortgage_percentage: Decimal,
    /// Sovereign amount.
    pub sovereign_amount: Decimal,
    /// Sovereign percentage.
    pub sovereign_percentage: Decimal,
    /// Corporate amount.
    pub corporate_amount: Decimal,
    /// Corporate percentage.
    pub corporate_percentage: Decimal,
    /// Banking amount.
    pub banking_amount: Decimal,
    /// Banking percentage.
    pub banking_percentage: Decimal,
    /// Other sector amount.
    pub other_amount: Decimal,
    /// Other sector percentage.
    pub other_percentage: Decimal,
    /// Geographic HHI.
    pub geographic_hhi: Decimal,
    /// Geographic concentration level.
    pub geographic_concentration_level: String,
    /// Sector HHI.
    pub sector_hhi: Decimal,
    /// Sector concentration level.
    pub sector_concentration_level: String,
    /// When the analysis was built.
    pub analyzed_at: Timestamp,
}

impl From<&PortfolioAnalysis> for PortfolioAnalysisSummary {
    fn from(analysis: &PortfolioAnalysis) -> Self {
        let geo = |region: GeographicRegion| entry(analysis.geographic_breakdown(), region.as_str());
        let sector = |s: SectorCategory| entry(analysis.sector_breakdown(), s.as_str());

        let italy = geo(GeographicRegion::Italy);
        let eu_other = geo(GeographicRegion::EuOther);
        let non_european = geo(GeographicRegion::NonEuropean);
        let retail_mortgage = sector(SectorCategory::RetailMortgage);
        let sovereign = sector(SectorCategory::Sovereign);
        let corporate = sector(SectorCategory::Corporate);
        let banking = sector(SectorCategory::Banking);
        let other = sector(SectorCategory::Other);

        Self {
            batch_id: analysis.batch_id().to_string(),
            total_portfolio_eur: analysis.total_portfolio_eur().value(),
            italy_amount: italy.amount_eur,
            italy_percentage: italy.percentage,
            eu_other_amount: eu_other.amount_eur,
            eu_other_percentage: eu_other.percentage,
            non_european_amount: non_european.amount_eur,
            non_european_percentage: non_european.percentage,
            retail_mortgage_amount: retail_mortgage.amount_eur,
            retail_mortgage_percentage: retail_mortgage.percentage,
            sovereign_amount: sovereign.amount_eur,
            sovereign_percentage: sovereign.percentage,
            corporate_amount: corporate.amount_eur,
            corporate_percentage: corporate.percentage,
            banking_amount: banking.amount_eur,
            banking_percentage: banking.percentage,
            other_amount: other.amount_eur,
            other_percentage: other.percentage,
            geographic_hhi: analysis.geographic_hhi().value(),
            geographic_concentration_level: analysis.geographic_hhi().level().to_string(),
            sector_hhi: analysis.sector_hhi().value(),
            sector_concentration_level: analysis.sector_hhi().level().to_string(),
            analyzed_at: analysis.analyzed_at(),
        }
    }
}

fn entry(breakdown: &Breakdown, category: &str) -> BreakdownEntryDto {
    breakdown
        .get_share(category)
        .map_or_else(|| BreakdownEntryDto::from(&Share::zero()), BreakdownEntryDto::from)
}
