//! Risk Parameters Repository Trait

use async_trait::async_trait;

use super::aggregate::RiskParameters;
use super::errors::ParametersError;
use crate::domain::shared::{BankId, RiskParametersId};

/// Repository for [`RiskParameters`], one parameter set per bank.
///
/// `save` is optimistic: it succeeds only if the stored version still equals
/// `parameters.version()`, and returns the new version.
#[async_trait]
pub trait RiskParametersRepository: Send + Sync {
    /// Save parameters, returning the new stored version.
    async fn save(&self, parameters: &RiskParameters) -> Result<u64, ParametersError>;

    /// Find the parameters for a bank.
    async fn find_by_bank_id(
        &self,
        bank_id: &BankId,
    ) -> Result<Option<RiskParameters>, ParametersError>;

    /// Find parameters by ID.
    async fn find_by_id(
        &self,
        id: &RiskParametersId,
    ) -> Result<Option<RiskParameters>, ParametersError>;
}
