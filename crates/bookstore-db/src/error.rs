//! # Database Error Types
//!
//! Error types for database operations and the sales engine.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)          CoreError (rule violation)         │
//! │       │                                   │                             │
//! │       ▼                                   │                             │
//! │  DbError ← Adds categorization            │                             │
//! │       │                                   │                             │
//! │       └──────────────┬────────────────────┘                             │
//! │                      ▼                                                  │
//! │  LedgerError (engine operations: Storage | Rejected)                   │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │  CliError (in app) ← notice printed to the operator                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bookstore_core::{CoreError, ErrorKind, ValidationError};
use thiserror::Error;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and operator feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_one` returns no rows
    /// - An update or delete matched zero rows
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema bootstrap failed.
    ///
    /// ## When This Occurs
    /// - A table exists with an incompatible shape
    /// - Seed insert rejected
    #[error("Schema bootstrap failed: {0}")]
    BootstrapFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed to begin or commit.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → DbError::QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Ledger Error
// =============================================================================

/// Error returned by the sales engine operations.
///
/// Either the operation was refused by a business rule (nothing was
/// written) or storage itself failed (the transaction was rolled back).
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Refused by a business rule.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// Storage failure.
    #[error(transparent)]
    Storage(#[from] DbError),
}

impl LedgerError {
    /// Domain category, if this is a rule rejection.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            LedgerError::Rejected(err) => Some(err.kind()),
            LedgerError::Storage(_) => None,
        }
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        LedgerError::Storage(err.into())
    }
}

impl From<ValidationError> for LedgerError {
    fn from(err: ValidationError) -> Self {
        LedgerError::Rejected(err.into())
    }
}

/// Result type for sales engine operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[test]
    fn test_ledger_error_kind() {
        let err: LedgerError = CoreError::SaleNotFound(3).into();
        assert_eq!(err.kind(), Some(ErrorKind::NotFound));

        let err: LedgerError = DbError::PoolExhausted.into();
        assert_eq!(err.kind(), None);

        let err: LedgerError = ValidationError::MustBeNonNegative {
            field: "discount".to_string(),
        }
        .into();
        assert_eq!(err.kind(), Some(ErrorKind::InvalidInput));
    }
}
