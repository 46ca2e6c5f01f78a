//! Risk parameters errors.

use std::fmt;

use crate::domain::shared::{BankId, DomainError};

/// Errors raised by the risk parameters aggregate and its repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParametersError {
    /// No parameters stored for the bank.
    NotFound {
        /// Bank ID.
        bank_id: BankId,
    },

    /// Stored version differs from the one the caller loaded.
    VersionConflict {
        /// Bank ID.
        bank_id: BankId,
        /// Version the caller loaded.
        expected: u64,
        /// Version currently stored.
        actual: u64,
    },

    /// Parameter values are inconsistent.
    InvalidConfiguration {
        /// Parameter field.
        field: String,
        /// Error message.
        message: String,
    },

    /// Backing store failed.
    Storage {
        /// Error message.
        message: String,
    },
}

impl ParametersError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ParametersError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { bank_id } => write!(f, "Risk parameters not found for bank {bank_id}"),
            Self::VersionConflict {
                bank_id,
                expected,
                actual,
            } => write!(
                f,
                "Risk parameters for bank {bank_id} were modified concurrently: expected version {expected}, found {actual}"
            ),
            Self::InvalidConfiguration { field, message } => {
                write!(f, "Invalid risk parameters [{field}]: {message}")
            }
            Self::Storage { message } => write!(f, "Risk parameters storage error: {message}"),
        }
    }
}

impl std::error::Error for ParametersError {}

impl From<ParametersError> for DomainError {
    fn from(err: ParametersError) -> Self {
        match err {
            ParametersError::NotFound { bank_id } => Self::NotFound {
                entity_type: "RiskParameters".to_string(),
                id: bank_id.into_inner(),
            },
            ParametersError::InvalidConfiguration { field, message } => {
                Self::InvalidValue { field, message }
            }
            other => Self::BusinessRuleViolation {
                rule: "risk_parameters".to_string(),
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_conflict_display() {
        let err = ParametersError::VersionConflict {
            bank_id: BankId::new("BANK-1"),
            expected: 2,
            actual: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("BANK-1"));
        assert!(msg.contains("expected version 2"));
        assert!(msg.contains("found 3"));
    }

    #[test]
    fn converts_to_domain_error() {
        let err: DomainError = ParametersError::NotFound {
            bank_id: BankId::new("BANK-1"),
        }
        .into();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let err: DomainError = ParametersError::invalid("limit", "too high").into();
        assert!(matches!(err, DomainError::InvalidValue { .. }));
    }
}
