//! Counterparty country to geographic region classification.

use std::collections::BTreeSet;

use crate::domain::analysis::GeographicRegion;
use crate::domain::shared::DomainError;

/// Default home country.
pub const DEFAULT_HOME_COUNTRY: &str = "IT";

/// EU member states (ISO 3166-1 alpha-2).
pub const EU_MEMBER_STATES: [&str; 27] = [
    "AT", "BE", "BG", "HR", "CY", "CZ", "DK", "EE", "FI", "FR", "DE", "GR", "HU", "IE", "IT",
    "LV", "LT", "LU", "MT", "NL", "PL", "PT", "RO", "SK", "SI", "ES", "SE",
];

/// Maps a counterparty country to ITALY / EU_OTHER / NON_EUROPEAN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeographicClassifier {
    home_country: String,
    eu_countries: BTreeSet<String>,
}

impl GeographicClassifier {
    /// Create a classifier for `home_country` and the given EU list.
    ///
    /// # Errors
    ///
    /// Returns error if any code is not two ASCII letters.
    pub fn new<I, S>(home_country: &str, eu_countries: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let home_country = normalize_country(home_country)?;
        let eu_countries = eu_countries
            .into_iter()
            .map(|c| normalize_country(c.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self {
            home_country,
            eu_countries,
        })
    }

    /// Home country code.
    #[must_use]
    pub fn home_country(&self) -> &str {
        &self.home_country
    }

    /// Region for `country_code`.
    ///
    /// # Errors
    ///
    /// Returns error if the code is not two ASCII letters.
    pub fn classify(&self, country_code: &str) -> Result<GeographicRegion, DomainError> {
        let code = normalize_country(country_code)?;
        Ok(if code == self.home_country {
            GeographicRegion::Italy
        } else if self.eu_countries.contains(&code) {
            GeographicRegion::EuOther
        } else {
            GeographicRegion::NonEuropean
        })
    }
}

impl Default for GeographicClassifier {
    fn default() -> Self {
        Self {
            home_country: DEFAULT_HOME_COUNTRY.to_string(),
            eu_countries: EU_MEMBER_STATES.iter().map(ToString::to_string).collect(),
        }
    }
}

fn normalize_country(code: &str) -> Result<String, DomainError> {
    let trimmed = code.trim();
    if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DomainError::invalid(
            "country_code",
            format!("'{code}' is not a two-letter country code"),
        ));
    }
    Ok(trimmed.to_ascii_uppercase())
}
