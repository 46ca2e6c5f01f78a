//! Portfolio analysis domain events.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{BatchId, EurAmount, Timestamp};

/// Event: a batch's portfolio analysis was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioAnalysisCompleted {
    /// Batch analysed.
    pub batch_id: BatchId,
    /// Total net portfolio in EUR.
    pub total_portfolio_eur: EurAmount,
    /// Geographic HHI value.
    pub geographic_hhi: Decimal,
    /// Sector HHI value.
    pub sector_hhi: Decimal,
    /// When the analysis completed.
    pub completed_at: Timestamp,
}
