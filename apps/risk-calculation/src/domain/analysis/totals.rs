//! Raw per-category amounts accumulated before shares are computed.
//!
//! Chunks each accumulate their own [`CategoryTotals`]; the totals are merged
//! by summation and the breakdowns and HHIs are computed once from the merged
//! amounts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::categories::{GeographicRegion, SectorCategory};
use crate::domain::protection::ProtectedExposure;
use crate::domain::shared::{DomainError, EurAmount};

/// A netted exposure tagged with its categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedExposure {
    /// The netted exposure.
    pub exposure: ProtectedExposure,
    /// Geographic region.
    pub region: GeographicRegion,
    /// Economic sector.
    pub sector: SectorCategory,
}

impl ClassifiedExposure {
    /// Tag a netted exposure.
    #[must_use]
    pub const fn new(
        exposure: ProtectedExposure,
        region: GeographicRegion,
        sector: SectorCategory,
    ) -> Self {
        Self {
            exposure,
            region,
            sector,
        }
    }

    /// Net EUR amount.
    #[must_use]
    pub const fn net_amount(&self) -> EurAmount {
        self.exposure.net_exposure()
    }
}

/// Amount and exposure count for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAmount {
    /// Summed net amount.
    pub amount: EurAmount,
    /// Number of exposures.
    pub count: usize,
}

impl CategoryAmount {
    fn add(&mut self, amount: EurAmount) -> Result<(), DomainError> {
        self.amount = self.amount.checked_add(amount)?;
        self.count += 1;
        Ok(())
    }

    fn merge(&mut self, other: Self) -> Result<(), DomainError> {
        self.amount = self.amount.checked_add(other.amount)?;
        self.count += other.count;
        Ok(())
    }
}

/// Portfolio totals grouped by region and sector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotals {
    total: EurAmount,
    exposure_count: usize,
    by_region: BTreeMap<GeographicRegion, CategoryAmount>,
    by_sector: BTreeMap<SectorCategory, CategoryAmount>,
}

impl CategoryTotals {
    /// Empty totals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate totals over `exposures`.
    ///
    /// # Errors
    ///
    /// Returns error if a running total overflows.
    pub fn from_exposures<'a, I>(exposures: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = &'a ClassifiedExposure>,
    {
        let mut totals = Self::new();
        for exposure in exposures {
            totals.add(exposure)?;
        }
        Ok(totals)
    }

    /// Add one exposure's net amount.
    ///
    /// The totals are left unchanged when the addition fails.
    ///
    /// # Errors
    ///
    /// Returns error if a running total overflows.
    pub fn add(&mut self, exposure: &ClassifiedExposure) -> Result<(), DomainError> {
        let amount = exposure.net_amount();
        let total = self.total.checked_add(amount)?;
        // region and sector sums never exceed the portfolio total
        self.by_region.entry(exposure.region).or_default().add(amount)?;
        self.by_sector.entry(exposure.sector).or_default().add(amount)?;
        self.total = total;
        self.exposure_count += 1;
        Ok(())
    }

    /// Sum another set of totals into this one.
    ///
    /// # Errors
    ///
    /// Returns error if a running total overflows.
    pub fn merge(&mut self, other: Self) -> Result<(), DomainError> {
        self.total = self.total.checked_add(other.total)?;
        self.exposure_count += other.exposure_count;
        for (region, amount) in other.by_region {
            self.by_region.entry(region).or_default().merge(amount)?;
        }
        for (sector, amount) in other.by_sector {
            self.by_sector.entry(sector).or_default().merge(amount)?;
        }
        Ok(())
    }

    /// Total net amount.
    #[must_use]
    pub const fn total(&self) -> EurAmount {
        self.total
    }

    /// Number of exposures accumulated.
    #[must_use]
    pub const fn exposure_count(&self) -> usize {
        self.exposure_count
    }

    /// Amounts by region.
    #[must_use]
    pub const fn by_region(&self) -> &BTreeMap<GeographicRegion, CategoryAmount> {
        &self.by_region
    }

    /// Amounts by sector.
    #[must_use]
    pub const fn by_sector(&self) -> &BTreeMap<SectorCategory, CategoryAmount> {
        &self.by_sector
    }
}
