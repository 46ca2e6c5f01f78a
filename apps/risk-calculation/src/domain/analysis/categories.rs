//! Geographic and sector categories used to group net exposures.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::shared::DomainError;

/// Geographic region of the counterparty, relative to the home country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeographicRegion {
    /// Home country.
    Italy,
    /// Other EU member state.
    EuOther,
    /// Outside the EU.
    NonEuropean,
}

impl GeographicRegion {
    /// All regions in reporting order.
    pub const ALL: [Self; 3] = [Self::Italy, Self::EuOther, Self::NonEuropean];

    /// Category name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Italy => "ITALY",
            Self::EuOther => "EU_OTHER",
            Self::NonEuropean => "NON_EUROPEAN",
        }
    }
}

/// Economic sector of the counterparty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectorCategory {
    /// Residential mortgages to households.
    RetailMortgage,
    /// Central governments and public bodies.
    Sovereign,
    /// Non-financial corporates.
    Corporate,
    /// Credit institutions.
    Banking,
    /// Anything else.
    Other,
}

impl SectorCategory {
    /// All sectors in reporting order.
    pub const ALL: [Self; 5] = [
        Self::RetailMortgage,
        Self::Sovereign,
        Self::Corporate,
        Self::Banking,
        Self::Other,
    ];

    /// Category name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RetailMortgage => "RETAIL_MORTGAGE",
            Self::Sovereign => "SOVEREIGN",
            Self::Corporate => "CORPORATE",
            Self::Banking => "BANKING",
            Self::Other => "OTHER",
        }
    }
}

macro_rules! impl_category_traits {
    ($name:ident, $field:literal) => {
        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_uppercase();
                Self::ALL
                    .into_iter()
                    .find(|c| c.as_str() == normalized)
                    .ok_or_else(|| {
                        DomainError::invalid($field, format!("unknown category '{s}'"))
                    })
            }
        }
    };
}

impl_category_traits!(GeographicRegion, "geographic_region");
impl_category_traits!(SectorCategory, "sector");

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("ITALY", GeographicRegion::Italy)]
    #[test_case("eu_other", GeographicRegion::EuOther)]
    #[test_case(" NON_EUROPEAN ", GeographicRegion::NonEuropean)]
    fn region_parses(input: &str, expected: GeographicRegion) {
        assert_eq!(input.parse::<GeographicRegion>().unwrap(), expected);
    }

    #[test_case("RETAIL_MORTGAGE", SectorCategory::RetailMortgage)]
    #[test_case("sovereign", SectorCategory::Sovereign)]
    #[test_case("Corporate", SectorCategory::Corporate)]
    #[test_case("BANKING", SectorCategory::Banking)]
    #[test_case("OTHER", SectorCategory::Other)]
    fn sector_parses(input: &str, expected: SectorCategory) {
        assert_eq!(input.parse::<SectorCategory>().unwrap(), expected);
    }

    #[test]
    fn unknown_category_rejected() {
        assert!("ASIA".parse::<GeographicRegion>().is_err());
        assert!("".parse::<SectorCategory>().is_err());
    }

    #[test]
    fn serde_uses_category_names() {
        assert_eq!(
            serde_json::to_string(&GeographicRegion::EuOther).unwrap(),
            "\"EU_OTHER\""
        );
        assert_eq!(
            serde_json::to_string(&SectorCategory::RetailMortgage).unwrap(),
            "\"RETAIL_MORTGAGE\""
        );
    }

    #[test]
    fn as_ref_matches_display() {
        for region in GeographicRegion::ALL {
            assert_eq!(region.as_ref(), region.to_string());
        }
        for sector in SectorCategory::ALL {
            assert_eq!(sector.as_ref(), sector.to_string());
        }
    }
}
