//! Category distribution of a portfolio.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::share::{DEFAULT_PERCENTAGE_SCALE, Share};
use crate::domain::shared::{DomainError, EurAmount};

/// Immutable mapping of category name to [`Share`].
///
/// Only categories present in the input appear. Keys are category names,
/// either free strings or enum names via `AsRef<str>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Breakdown {
    shares: BTreeMap<String, Share>,
}

impl Breakdown {
    /// Build from per-category amounts against `total`.
    ///
    /// Repeated keys are summed before shares are computed.
    ///
    /// # Errors
    ///
    /// Returns error if a category sum overflows.
    pub fn from_amounts<K, I>(amounts: I, total: EurAmount) -> Result<Self, DomainError>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, EurAmount)>,
    {
        Self::from_amounts_scaled(amounts, total, DEFAULT_PERCENTAGE_SCALE)
    }

    /// Same as [`Breakdown::from_amounts`] with an explicit percentage scale.
    ///
    /// # Errors
    ///
    /// Returns error if a category sum overflows.
    pub fn from_amounts_scaled<K, I>(
        amounts: I,
        total: EurAmount,
        scale: u32,
    ) -> Result<Self, DomainError>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, EurAmount)>,
    {
        let mut grouped: BTreeMap<String, EurAmount> = BTreeMap::new();
        for (key, amount) in amounts {
            let entry = grouped.entry(key.as_ref().to_string()).or_default();
            *entry = entry.checked_add(amount)?;
        }

        let shares = grouped
            .into_iter()
            .map(|(key, amount)| (key, Share::calculate_scaled(amount, total, scale)))
            .collect();
        Ok(Self { shares })
    }

    /// Share for `category`, if present.
    #[must_use]
    pub fn get_share(&self, category: &str) -> Option<&Share> {
        self.shares.get(category)
    }

    /// Returns true if `category` is present.
    #[must_use]
    pub fn has_category(&self, category: &str) -> bool {
        self.shares.contains_key(category)
    }

    /// Read-only view of all shares, ordered by category name.
    #[must_use]
    pub const fn shares(&self) -> &BTreeMap<String, Share> {
        &self.shares
    }

    /// Category names, ordered.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.shares.keys().map(String::as_str)
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Returns true if there are no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Sum of all percentages.
    #[must_use]
    pub fn total_percentage(&self) -> Decimal {
        self.shares.values().map(Share::percentage).sum()
    }
}
