//! Strongly-typed identifiers for domain entities.
//!
//! These prevent mixing up exposure, batch and bank IDs.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Generate a new unique identifier using UUID v4.
            #[must_use]
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Get the inner string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the identifier is blank.
            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }

            /// Consume and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_id!(ExposureId, "Identifier of a single credit exposure within a batch.");
define_id!(BatchId, "Identifier of a reporting batch.");
define_id!(BankId, "Identifier of the reporting bank.");
define_id!(RiskParametersId, "Identifier of a bank's risk parameter set.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposure_id_new_and_display() {
        let id = ExposureId::new("EXP-001");
        assert_eq!(id.as_str(), "EXP-001");
        assert_eq!(format!("{id}"), "EXP-001");
    }

    #[test]
    fn risk_parameters_id_generate_is_unique() {
        assert_ne!(RiskParametersId::generate(), RiskParametersId::generate());
    }

    #[test]
    fn batch_id_blank_detection() {
        assert!(BatchId::new("  ").is_blank());
        assert!(!BatchId::new("BATCH-001").is_blank());
    }

    #[test]
    fn id_from_conversions() {
        let id: BankId = "BANK-IT-01".into();
        assert_eq!(id.clone().into_inner(), "BANK-IT-01");
        let id: BankId = String::from("BANK-IT-01").into();
        assert_eq!(id.as_str(), "BANK-IT-01");
    }

    #[test]
    fn serde_roundtrip() {
        let id = BatchId::new("BATCH-001");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"BATCH-001\"");
        assert_eq!(serde_json::from_str::<BatchId>(&json).unwrap(), id);
    }
}
