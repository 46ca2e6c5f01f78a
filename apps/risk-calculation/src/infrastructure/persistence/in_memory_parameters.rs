//! In-memory risk parameters repository.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::parameters::{ParametersError, RiskParameters, RiskParametersRepository};
use crate::domain::shared::{BankId, RiskParametersId};

/// In-memory implementation of `RiskParametersRepository`.
///
/// Holds one parameter set per bank and enforces the optimistic version
/// check. Suitable for testing and development.
#[derive(Debug, Default)]
pub struct InMemoryRiskParametersRepository {
    parameters: RwLock<HashMap<BankId, RiskParameters>>,
}

impl InMemoryRiskParametersRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of banks with stored parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parameters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RiskParametersRepository for InMemoryRiskParametersRepository {
    async fn save(&self, parameters: &RiskParameters) -> Result<u64, ParametersError> {
        let mut stored = self
            .parameters
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let actual = stored.get(parameters.bank_id()).map_or(0, RiskParameters::version);
        if actual != parameters.version() {
            return Err(ParametersError::VersionConflict {
                bank_id: parameters.bank_id().clone(),
                expected: parameters.version(),
                actual,
            });
        }

        let version = actual + 1;
        let mut saved = parameters.clone();
        saved.mark_saved(version);
        stored.insert(parameters.bank_id().clone(), saved);
        drop(stored);

        debug!(bank_id = %parameters.bank_id(), version, "Risk parameters saved");
        Ok(version)
    }

    async fn find_by_bank_id(
        &self,
        bank_id: &BankId,
    ) -> Result<Option<RiskParameters>, ParametersError> {
        let stored = self
            .parameters
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(stored.get(bank_id).cloned())
    }

    async fn find_by_id(
        &self,
        id: &RiskParametersId,
    ) -> Result<Option<RiskParameters>, ParametersError> {
        let stored = self
            .parameters
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(stored.values().find(|p| p.id() == id).cloned())
    }
}
