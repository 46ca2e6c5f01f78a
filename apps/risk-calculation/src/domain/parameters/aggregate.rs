//! Risk Parameters Aggregate

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::events::{
    ParameterSection, RiskParametersCreated, RiskParametersEvent, RiskParametersReset,
    RiskParametersUpdated,
};
use super::value_objects::{
    CapitalBaseParameters, ConcentrationRiskParameters, LargeExposuresParameters,
    ValidationStatus,
};
use crate::domain::shared::{BankId, RiskParametersId, Timestamp};

/// Audit fields carried by a stored parameter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditInfo {
    /// Creation time.
    pub created_at: Timestamp,
    /// Last modification time.
    pub last_modified_at: Option<Timestamp>,
    /// Last modifier.
    pub last_modified_by: Option<String>,
}

/// Risk Parameters Aggregate - a bank's regulatory thresholds.
///
/// Read-only during a calculation. Changes go through the `update_*` methods,
/// each of which records a domain event. `version` is owned by the repository
/// and used for optimistic concurrency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskParameters {
    id: RiskParametersId,
    bank_id: BankId,
    large_exposures: LargeExposuresParameters,
    capital_base: CapitalBaseParameters,
    concentration_risk: ConcentrationRiskParameters,
    validation_status: ValidationStatus,
    audit: AuditInfo,
    version: u64,
    #[serde(skip)]
    domain_events: Vec<RiskParametersEvent>,
}

impl RiskParameters {
    /// New parameters with regulatory defaults for `bank_id`.
    #[must_use]
    pub fn create_default(bank_id: BankId, created_by: impl Into<String>) -> Self {
        let id = RiskParametersId::generate();
        let created_by = created_by.into();
        let now = Timestamp::now();

        let mut params = Self {
            id: id.clone(),
            bank_id: bank_id.clone(),
            large_exposures: LargeExposuresParameters::default(),
            capital_base: CapitalBaseParameters::default(),
            concentration_risk: ConcentrationRiskParameters::default(),
            validation_status: ValidationStatus::valid(),
            audit: AuditInfo {
                created_at: now,
                last_modified_at: Some(now),
                last_modified_by: Some(created_by.clone()),
            },
            version: 0,
            domain_events: Vec::new(),
        };
        params.domain_events.push(RiskParametersEvent::Created(RiskParametersCreated {
            parameters_id: id,
            bank_id,
            created_by,
            occurred_at: now,
        }));
        params
    }

    /// Rebuild stored parameters without recording events.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: RiskParametersId,
        bank_id: BankId,
        large_exposures: LargeExposuresParameters,
        capital_base: CapitalBaseParameters,
        concentration_risk: ConcentrationRiskParameters,
        validation_status: ValidationStatus,
        audit: AuditInfo,
        version: u64,
    ) -> Self {
        Self {
            id,
            bank_id,
            large_exposures,
            capital_base,
            concentration_risk,
            validation_status,
            audit,
            version,
            domain_events: Vec::new(),
        }
    }

    /// Replace the large exposure limits.
    pub fn update_large_exposures(
        &mut self,
        parameters: LargeExposuresParameters,
        modified_by: impl Into<String>,
    ) {
        self.large_exposures = parameters;
        self.record_update(ParameterSection::LargeExposures, modified_by.into());
    }

    /// Replace the capital base.
    pub fn update_capital_base(
        &mut self,
        parameters: CapitalBaseParameters,
        modified_by: impl Into<String>,
    ) {
        self.capital_base = parameters;
        self.record_update(ParameterSection::CapitalBase, modified_by.into());
    }

    /// Replace the concentration thresholds.
    pub fn update_concentration_risk(
        &mut self,
        parameters: ConcentrationRiskParameters,
        modified_by: impl Into<String>,
    ) {
        self.concentration_risk = parameters;
        self.record_update(ParameterSection::ConcentrationRisk, modified_by.into());
    }

    /// Restore every group to its default.
    pub fn reset_to_default(&mut self, modified_by: impl Into<String>) {
        let modified_by = modified_by.into();
        let now = Timestamp::now();
        self.large_exposures = LargeExposuresParameters::default();
        self.capital_base = CapitalBaseParameters::default();
        self.concentration_risk = ConcentrationRiskParameters::default();
        self.validation_status = ValidationStatus::valid();
        self.touch(now, modified_by.clone());
        self.domain_events.push(RiskParametersEvent::Reset(RiskParametersReset {
            parameters_id: self.id.clone(),
            bank_id: self.bank_id.clone(),
            modified_by,
            occurred_at: now,
        }));
    }

    /// Recompute the validation status as of `as_of`.
    pub fn validate(&mut self, as_of: NaiveDate) -> ValidationStatus {
        let bcbs239_compliant = self.large_exposures.is_valid()
            && self.capital_base.is_valid()
            && self.concentration_risk.is_valid();
        self.validation_status = ValidationStatus {
            bcbs239_compliant,
            capital_up_to_date: self.capital_base.is_up_to_date(as_of),
        };
        self.validation_status
    }

    /// Take the events recorded since the last call.
    pub fn pull_domain_events(&mut self) -> Vec<RiskParametersEvent> {
        std::mem::take(&mut self.domain_events)
    }

    /// Set the version assigned by the repository after a save.
    pub fn mark_saved(&mut self, version: u64) {
        self.version = version;
    }

    fn record_update(&mut self, section: ParameterSection, modified_by: String) {
        let now = Timestamp::now();
        self.touch(now, modified_by.clone());
        self.domain_events.push(RiskParametersEvent::Updated(RiskParametersUpdated {
            parameters_id: self.id.clone(),
            bank_id: self.bank_id.clone(),
            section,
            modified_by,
            occurred_at: now,
        }));
    }

    fn touch(&mut self, now: Timestamp, modified_by: String) {
        self.audit.last_modified_at = Some(now);
        self.audit.last_modified_by = Some(modified_by);
    }

    /// Parameters ID.
    #[must_use]
    pub const fn id(&self) -> &RiskParametersId {
        &self.id
    }

    /// Bank ID.
    #[must_use]
    pub const fn bank_id(&self) -> &BankId {
        &self.bank_id
    }

    /// Large exposure limits.
    #[must_use]
    pub const fn large_exposures(&self) -> &LargeExposuresParameters {
        &self.large_exposures
    }

    /// Capital base.
    #[must_use]
    pub const fn capital_base(&self) -> &CapitalBaseParameters {
        &self.capital_base
    }

    /// Concentration thresholds.
    #[must_use]
    pub const fn concentration_risk(&self) -> &ConcentrationRiskParameters {
        &self.concentration_risk
    }

    /// Last validation status.
    #[must_use]
    pub const fn validation_status(&self) -> ValidationStatus {
        self.validation_status
    }

    /// Audit fields.
    #[must_use]
    pub const fn audit(&self) -> &AuditInfo {
        &self.audit
    }

    /// Stored version.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::EurAmount;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn create_default_records_created_event() {
        let mut params = RiskParameters::create_default(BankId::new("BANK-1"), "admin");

        assert_eq!(params.bank_id().as_str(), "BANK-1");
        assert_eq!(params.version(), 0);
        assert_eq!(params.large_exposures().limit_percent(), dec!(25));
        assert_eq!(params.audit().last_modified_by.as_deref(), Some("admin"));

        let events = params.pull_domain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "RISK_PARAMETERS_CREATED");
        assert!(params.pull_domain_events().is_empty());
    }

    #[test]
    fn updates_record_section_events() {
        let mut params = RiskParameters::create_default(BankId::new("BANK-1"), "admin");
        params.pull_domain_events();

        params.update_large_exposures(
            LargeExposuresParameters::new(dec!(20), dec!(10), 10).unwrap(),
            "risk-officer",
        );
        params.update_concentration_risk(
            ConcentrationRiskParameters::new(dec!(30), dec!(20)).unwrap(),
            "risk-officer",
        );

        let events = params.pull_domain_events();
        assert_eq!(events.len(), 2);
        match &events[0] {
            RiskParametersEvent::Updated(e) => {
                assert_eq!(e.section, ParameterSection::LargeExposures);
                assert_eq!(e.modified_by, "risk-officer");
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(params.large_exposures().max_large_exposures(), 10);
        assert_eq!(params.concentration_risk().alert_threshold_percent(), dec!(30));
    }

    #[test]
    fn validate_reflects_capital_base() {
        let mut params = RiskParameters::create_default(BankId::new("BANK-1"), "admin");
        let as_of = date(2025, 12, 31);

        let status = params.validate(as_of);
        assert!(!status.bcbs239_compliant);
        assert!(!status.capital_up_to_date);

        params.update_capital_base(
            CapitalBaseParameters::new(
                EurAmount::from_units(1_000_000),
                EurAmount::from_units(900_000),
                date(2025, 9, 30),
            )
            .unwrap(),
            "cfo",
        );
        let status = params.validate(as_of);
        assert!(status.is_valid());
        assert_eq!(params.validation_status(), status);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut params = RiskParameters::create_default(BankId::new("BANK-1"), "admin");
        params.update_large_exposures(
            LargeExposuresParameters::new(dec!(20), dec!(5), 3).unwrap(),
            "admin",
        );
        params.pull_domain_events();

        params.reset_to_default("auditor");

        assert_eq!(*params.large_exposures(), LargeExposuresParameters::default());
        assert_eq!(params.audit().last_modified_by.as_deref(), Some("auditor"));
        let events = params.pull_domain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "RISK_PARAMETERS_RESET");
    }

    #[test]
    fn reconstitute_has_no_events() {
        let original = RiskParameters::create_default(BankId::new("BANK-1"), "admin");
        let mut restored = RiskParameters::reconstitute(
            original.id().clone(),
            original.bank_id().clone(),
            *original.large_exposures(),
            *original.capital_base(),
            *original.concentration_risk(),
            original.validation_status(),
            original.audit().clone(),
            7,
        );
        assert_eq!(restored.version(), 7);
        assert!(restored.pull_domain_events().is_empty());
    }

    #[test]
    fn serde_skips_pending_events() {
        let params = RiskParameters::create_default(BankId::new("BANK-1"), "admin");
        let json = serde_json::to_string(&params).unwrap();
        assert!(!json.contains("domain_events"));
        let mut back: RiskParameters = serde_json::from_str(&json).unwrap();
        assert!(back.pull_domain_events().is_empty());
        assert_eq!(back.id(), params.id());
    }
}
