//! Database error types

use coinshop_types::LedgerError;
use thiserror::Error;

/// Database operation errors
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Insufficient funds: have {available}, need {required}")]
    InsufficientFunds { available: u64, required: u64 },

    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

impl From<DbError> for LedgerError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(name) => LedgerError::AccountNotFound { name },
            DbError::Duplicate(name) => LedgerError::AccountExists { name },
            DbError::InsufficientFunds {
                available,
                required,
            } => LedgerError::InsufficientFunds {
                available,
                required,
            },
            DbError::Connection(_)
            | DbError::Migration(_)
            | DbError::Query(_)
            | DbError::Corrupt(_) => LedgerError::storage(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_onto_ledger_taxonomy() {
        let e: LedgerError = DbError::Duplicate("alice".into()).into();
        assert!(matches!(e, LedgerError::AccountExists { ref name } if name == "alice"));

        let e: LedgerError = DbError::InsufficientFunds {
            available: 10,
            required: 60,
        }
        .into();
        assert_eq!(e.error_code(), "INSUFFICIENT_FUNDS");

        let e: LedgerError = DbError::Connection("refused".into()).into();
        assert!(e.is_storage());
    }
}
