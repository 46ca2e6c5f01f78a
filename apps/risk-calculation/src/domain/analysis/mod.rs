//! Portfolio analysis bounded context.
//!
//! Groups net exposures by region and sector, expresses each group as a
//! share of the portfolio and measures concentration with the HHI.

pub mod breakdown;
pub mod categories;
pub mod events;
pub mod hhi;
pub mod portfolio_analysis;
pub mod share;
pub mod totals;

pub use breakdown::Breakdown;
pub use categories::{GeographicRegion, SectorCategory};
pub use events::PortfolioAnalysisCompleted;
pub use hhi::{
    ConcentrationLevel, ConcentrationThresholds, DEFAULT_HIGH_THRESHOLD,
    DEFAULT_MODERATE_THRESHOLD, Hhi,
};
pub use portfolio_analysis::{AnalysisSettings, PortfolioAnalysis};
pub use share::{DEFAULT_PERCENTAGE_SCALE, Share};
pub use totals::{CategoryAmount, CategoryTotals, ClassifiedExposure};
