//! Calculation input DTOs

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::analysis::{GeographicRegion, SectorCategory};
use crate::domain::classification::GeographicClassifier;
use crate::domain::protection::MitigationType;
use crate::domain::shared::DomainError;

/// One validated exposure record of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposureRecordDto {
    /// Exposure ID.
    pub exposure_id: String,
    /// Gross amount in `currency`.
    pub gross_amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Counterparty country, used when no region is supplied.
    #[serde(default)]
    pub country_code: Option<String>,
    /// Geographic region, if already classified.
    #[serde(default)]
    pub geographic_region: Option<GeographicRegion>,
    /// Economic sector.
    pub sector: SectorCategory,
}

impl ExposureRecordDto {
    /// Record with a supplied region.
    #[must_use]
    pub fn new(
        exposure_id: impl Into<String>,
        gross_amount: Decimal,
        currency: impl Into<String>,
        geographic_region: GeographicRegion,
        sector: SectorCategory,
    ) -> Self {
        Self {
            exposure_id: exposure_id.into(),
            gross_amount,
            currency: currency.into(),
            country_code: None,
            geographic_region: Some(geographic_region),
            sector,
        }
    }

    /// Record whose region is derived from the counterparty country.
    #[must_use]
    pub fn with_country(
        exposure_id: impl Into<String>,
        gross_amount: Decimal,
        currency: impl Into<String>,
        country_code: impl Into<String>,
        sector: SectorCategory,
    ) -> Self {
        Self {
            exposure_id: exposure_id.into(),
            gross_amount,
            currency: currency.into(),
            country_code: Some(country_code.into()),
            geographic_region: None,
            sector,
        }
    }

    /// Supplied region, or the classifier's region for the country.
    ///
    /// # Errors
    ///
    /// Returns error if neither a region nor a valid country is present.
    pub fn resolve_region(
        &self,
        classifier: &GeographicClassifier,
    ) -> Result<GeographicRegion, DomainError> {
        match (&self.geographic_region, &self.country_code) {
            (Some(region), _) => Ok(*region),
            (None, Some(country)) => classifier.classify(country),
            (None, None) => Err(DomainError::invalid(
                "geographic_region",
                format!(
                    "exposure {} has neither a region nor a country",
                    self.exposure_id
                ),
            )),
        }
    }
}

/// A raw mitigation attached to an exposure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MitigationDto {
    /// Mitigation type.
    pub mitigation_type: MitigationType,
    /// Value in `currency`.
    pub value: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
}

impl MitigationDto {
    /// Create a mitigation record.
    #[must_use]
    pub fn new(mitigation_type: MitigationType, value: Decimal, currency: impl Into<String>) -> Self {
        Self {
            mitigation_type,
            value,
            currency: currency.into(),
        }
    }
}

/// Everything needed to calculate one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRequestDto {
    /// Batch ID.
    pub batch_id: String,
    /// Bank ID.
    pub bank_id: String,
    /// Reporting date used for exchange rates.
    pub as_of: NaiveDate,
    /// Exposure records.
    pub exposures: Vec<ExposureRecordDto>,
    /// Mitigations keyed by exposure ID.
    #[serde(default)]
    pub mitigations: HashMap<String, Vec<MitigationDto>>,
}

impl CalculationRequestDto {
    /// Copy with exposure ids and mitigation keys trimmed.
    ///
    /// Mitigation lists whose keys collide after trimming are concatenated
    /// in key order.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        for record in &mut self.exposures {
            record.exposure_id = record.exposure_id.trim().to_string();
        }
        let mut keyed: Vec<(String, Vec<MitigationDto>)> = self.mitigations.drain().collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, mitigations) in keyed {
            self.mitigations
                .entry(key.trim().to_string())
                .or_default()
                .extend(mitigations);
        }
        self
    }

    /// Currencies appearing in exposures and mitigations, sorted and deduplicated.
    #[must_use]
    pub fn currencies(&self) -> Vec<String> {
        let mut currencies: Vec<String> = self
            .exposures
            .iter()
            .map(|e| e.currency.trim().to_ascii_uppercase())
            .chain(
                self.mitigations
                    .values()
                    .flatten()
                    .map(|m| m.currency.trim().to_ascii_uppercase()),
            )
            .collect();
        currencies.sort();
        currencies.dedup();
        currencies
    }

    /// Mitigations of one exposure, empty if none.
    #[must_use]
    pub fn mitigations_for(&self, exposure_id: &str) -> &[MitigationDto] {
        self.mitigations
            .get(exposure_id.trim())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
