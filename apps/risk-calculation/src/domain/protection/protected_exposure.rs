//! Exposure netting against its mitigations.

use serde::{Deserialize, Serialize};

use super::mitigation::Mitigation;
use crate::domain::shared::{DomainError, EurAmount, ExposureId};

/// One exposure's gross EUR amount netted against its mitigations.
///
/// `net = max(0, gross - total_mitigation)`; net is never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedExposure {
    exposure_id: ExposureId,
    gross_exposure: EurAmount,
    mitigations: Vec<Mitigation>,
    total_mitigation: EurAmount,
    net_exposure: EurAmount,
}

impl ProtectedExposure {
    /// Net `gross` against `mitigations`.
    ///
    /// # Errors
    ///
    /// Returns error if `exposure_id` is blank or the mitigation total
    /// overflows.
    pub fn calculate(
        exposure_id: ExposureId,
        gross_exposure: EurAmount,
        mitigations: Vec<Mitigation>,
    ) -> Result<Self, DomainError> {
        if exposure_id.is_blank() {
            return Err(DomainError::invalid("exposure_id", "exposure id cannot be blank"));
        }

        let total_mitigation = EurAmount::try_sum(mitigations.iter().map(Mitigation::eur_value))?;
        let net_exposure = gross_exposure.saturating_sub(total_mitigation);

        Ok(Self {
            exposure_id,
            gross_exposure,
            mitigations,
            total_mitigation,
            net_exposure,
        })
    }

    /// Exposure with no mitigations; net equals gross.
    ///
    /// # Errors
    ///
    /// Returns error if `exposure_id` is blank.
    pub fn without_mitigations(
        exposure_id: ExposureId,
        gross_exposure: EurAmount,
    ) -> Result<Self, DomainError> {
        Self::calculate(exposure_id, gross_exposure, Vec::new())
    }

    /// Exposure identifier.
    #[must_use]
    pub const fn exposure_id(&self) -> &ExposureId {
        &self.exposure_id
    }

    /// Gross amount in EUR.
    #[must_use]
    pub const fn gross_exposure(&self) -> EurAmount {
        self.gross_exposure
    }

    /// Mitigations applied, in input order.
    #[must_use]
    pub fn mitigations(&self) -> &[Mitigation] {
        &self.mitigations
    }

    /// Sum of mitigation EUR values.
    #[must_use]
    pub const fn total_mitigation(&self) -> EurAmount {
        self.total_mitigation
    }

    /// Net amount after mitigation, floored at zero.
    #[must_use]
    pub const fn net_exposure(&self) -> EurAmount {
        self.net_exposure
    }

    /// Returns true if any mitigation was applied.
    #[must_use]
    pub fn has_mitigations(&self) -> bool {
        !self.mitigations.is_empty()
    }

    /// Returns true if mitigations cover the whole gross amount.
    #[must_use]
    pub fn is_fully_covered(&self) -> bool {
        self.net_exposure.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::protection::MitigationType;
    use crate::domain::valuation::{
        ExchangeRate, ExchangeRateCache, ExchangeRateProvider, ValuationError,
    };
    use crate::domain::shared::CurrencyCode;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn rates() -> ExchangeRateCache {
        let provider: Arc<dyn ExchangeRateProvider> = Arc::new(
            |from: &CurrencyCode,
             to: &CurrencyCode,
             date: NaiveDate|
             -> Result<ExchangeRate, ValuationError> {
                ExchangeRate::new(dec!(1.2), from.clone(), to.clone(), date)
            },
        );
        ExchangeRateCache::new(provider, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap())
    }

    fn eur_mitigation(value: Decimal) -> Mitigation {
        Mitigation::create(MitigationType::FinancialCollateral, value, "EUR", &mut rates())
            .unwrap()
    }

    #[test]
    fn partially_covered_exposure() {
        let exposure = ProtectedExposure::calculate(
            ExposureId::new("EXP-1"),
            EurAmount::from_units(100_000),
            vec![eur_mitigation(dec!(20000)), eur_mitigation(dec!(30000))],
        )
        .unwrap();

        assert_eq!(exposure.total_mitigation(), EurAmount::from_units(50_000));
        assert_eq!(exposure.net_exposure(), EurAmount::from_units(50_000));
        assert!(!exposure.is_fully_covered());
        assert!(exposure.has_mitigations());
    }

    #[test]
    fn over_collateralised_exposure_floors_at_zero() {
        let exposure = ProtectedExposure::calculate(
            ExposureId::new("EXP-2"),
            EurAmount::from_units(50_000),
            vec![eur_mitigation(dec!(80000))],
        )
        .unwrap();

        assert_eq!(exposure.net_exposure(), EurAmount::ZERO);
        assert!(exposure.is_fully_covered());
    }

    #[test]
    fn foreign_currency_mitigation() {
        let mut rates = rates();
        let usd_guarantee =
            Mitigation::create(MitigationType::Guarantee, dec!(12000), "USD", &mut rates).unwrap();
        let exposure = ProtectedExposure::calculate(
            ExposureId::new("EXP-3"),
            EurAmount::from_units(100_000),
            vec![usd_guarantee],
        )
        .unwrap();

        assert_eq!(exposure.total_mitigation().value(), dec!(14400.00));
        assert_eq!(exposure.net_exposure().value(), dec!(85600.00));
    }

    #[test]
    fn without_mitigations_nets_to_gross() {
        let exposure =
            ProtectedExposure::without_mitigations(ExposureId::new("EXP-4"), EurAmount::from_units(7))
                .unwrap();
        assert_eq!(exposure.net_exposure(), exposure.gross_exposure());
        assert_eq!(exposure.total_mitigation(), EurAmount::ZERO);
        assert!(!exposure.has_mitigations());
    }

    #[test]
    fn zero_gross_without_mitigations_is_fully_covered() {
        let exposure =
            ProtectedExposure::without_mitigations(ExposureId::new("EXP-5"), EurAmount::ZERO)
                .unwrap();
        assert!(exposure.is_fully_covered());
    }

    #[test]
    fn blank_exposure_id_rejected() {
        assert!(ProtectedExposure::without_mitigations(ExposureId::new(" "), EurAmount::ZERO).is_err());
    }

    #[test]
    fn mitigation_total_overflow_is_error() {
        let huge = eur_mitigation(Decimal::MAX);
        let result = ProtectedExposure::calculate(
            ExposureId::new("EXP-6"),
            EurAmount::from_units(100),
            vec![huge.clone(), huge],
        );
        assert!(matches!(result, Err(DomainError::InvalidValue { .. })));
    }

    proptest! {
        #[test]
        fn net_is_gross_minus_mitigation_floored(
            gross in 0u64..10_000_000,
            values in prop::collection::vec(0u64..5_000_000, 0..6),
        ) {
            let mitigations: Vec<Mitigation> =
                values.iter().map(|v| eur_mitigation(Decimal::from(*v))).collect();
            let exposure = ProtectedExposure::calculate(
                ExposureId::new("EXP-P"),
                EurAmount::from_units(gross),
                mitigations,
            )
            .unwrap();

            let total: u64 = values.iter().sum();
            let expected = gross.saturating_sub(total);
            prop_assert_eq!(exposure.net_exposure().value(), Decimal::from(expected));
            prop_assert_eq!(exposure.is_fully_covered(), expected == 0);
            prop_assert!(exposure.net_exposure() <= exposure.gross_exposure());
        }
    }
}
