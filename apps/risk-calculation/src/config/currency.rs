//! Currency conversion configuration.

use serde::{Deserialize, Serialize};

/// Currency conversion configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Reporting currency. Only EUR is supported.
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    /// Load every batch currency's rate before netting.
    #[serde(default = "default_true")]
    pub preload_enabled: bool,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            base_currency: default_base_currency(),
            preload_enabled: true,
        }
    }
}

fn default_base_currency() -> String {
    "EUR".to_string()
}

pub(crate) const fn default_true() -> bool {
    true
}
