//! Error taxonomy
//!
//! Every ledger operation reports failures as one of these kinds; callers
//! match on the kind, never on a concrete source type. Validation failures
//! are raised before any mutation, so an error implies no partial effect.

use thiserror::Error;

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Failure kinds for ledger operations.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// Referenced account does not exist.
    #[error("account not found: {name}")]
    AccountNotFound { name: String },

    /// Referenced catalog item does not exist.
    #[error("item not found: {name}")]
    ItemNotFound { name: String },

    /// Account name already taken at creation.
    #[error("account already exists: {name}")]
    AccountExists { name: String },

    /// Supplied credential does not match the stored one.
    #[error("wrong credential")]
    WrongCredential,

    /// Non-positive or otherwise unusable amount.
    #[error("invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// Debit would take the balance below zero.
    #[error("insufficient funds: have {available}, need {required}")]
    InsufficientFunds { available: u64, required: u64 },

    /// Durable-store I/O or transaction failure; the enclosing atomic unit
    /// has been rolled back.
    #[error("storage failure: {message}")]
    Storage { message: String },
}

impl LedgerError {
    pub fn invalid_amount(reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            reason: reason.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Stable machine-readable code for boundary-layer responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotFound { .. } => "ACCOUNT_NOT_FOUND",
            Self::ItemNotFound { .. } => "ITEM_NOT_FOUND",
            Self::AccountExists { .. } => "ACCOUNT_EXISTS",
            Self::WrongCredential => "WRONG_CREDENTIAL",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::Storage { .. } => "STORAGE_FAILURE",
        }
    }

    /// Whether this failure came from the durable store rather than
    /// validation; only these are worth logging at error level.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(
            LedgerError::InsufficientFunds {
                available: 10,
                required: 60
            }
            .error_code(),
            "INSUFFICIENT_FUNDS"
        );
        assert_eq!(LedgerError::WrongCredential.error_code(), "WRONG_CREDENTIAL");
        assert_eq!(
            LedgerError::invalid_amount("zero").error_code(),
            "INVALID_AMOUNT"
        );
    }

    #[test]
    fn only_storage_is_server_side() {
        assert!(LedgerError::storage("io").is_storage());
        assert!(!LedgerError::WrongCredential.is_storage());
    }
}
