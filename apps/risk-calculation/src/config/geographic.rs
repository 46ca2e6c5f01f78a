//! Geographic classification configuration.

use serde::{Deserialize, Serialize};

use crate::domain::classification::{DEFAULT_HOME_COUNTRY, EU_MEMBER_STATES};

/// Home country and EU membership used to classify counterparties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeographicConfig {
    /// Home country (ISO 3166-1 alpha-2).
    #[serde(default = "default_home_country")]
    pub home_country: String,
    /// EU member states.
    #[serde(default = "default_eu_countries")]
    pub eu_countries: Vec<String>,
}

impl Default for GeographicConfig {
    fn default() -> Self {
        Self {
            home_country: default_home_country(),
            eu_countries: default_eu_countries(),
        }
    }
}

fn default_home_country() -> String {
    DEFAULT_HOME_COUNTRY.to_string()
}

fn default_eu_countries() -> Vec<String> {
    EU_MEMBER_STATES.iter().map(ToString::to_string).collect()
}
