//! Portfolio Analysis Repository Port (Driven Port)
//!
//! Interface for persisting one portfolio analysis per batch.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::analysis::PortfolioAnalysis;
use crate::domain::shared::BatchId;

/// Repository error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RepositoryError {
    /// Backing store unreachable.
    #[error("Repository connection error: {message}")]
    ConnectionError { message: String },

    /// Write rejected.
    #[error("Repository write failed: {message}")]
    WriteFailed { message: String },
}

/// Port for portfolio analysis persistence.
#[async_trait]
pub trait AnalysisRepositoryPort: Send + Sync {
    /// Save an analysis, replacing any earlier analysis of the same batch.
    async fn save(&self, analysis: &PortfolioAnalysis) -> Result<(), RepositoryError>;

    /// Find the analysis of a batch.
    async fn find_by_batch_id(
        &self,
        batch_id: &BatchId,
    ) -> Result<Option<PortfolioAnalysis>, RepositoryError>;
}

/// In-memory implementation for testing.
#[derive(Debug, Default)]
pub struct InMemoryAnalysisRepository {
    analyses: RwLock<HashMap<BatchId, PortfolioAnalysis>>,
}

impl InMemoryAnalysisRepository {
    /// Create a new in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored analyses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.analyses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AnalysisRepositoryPort for InMemoryAnalysisRepository {
    async fn save(&self, analysis: &PortfolioAnalysis) -> Result<(), RepositoryError> {
        let mut analyses = self
            .analyses
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        analyses.insert(analysis.batch_id().clone(), analysis.clone());
        drop(analyses);
        Ok(())
    }

    async fn find_by_batch_id(
        &self,
        batch_id: &BatchId,
    ) -> Result<Option<PortfolioAnalysis>, RepositoryError> {
        let analyses = self
            .analyses
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(analyses.get(batch_id).cloned())
    }
}
