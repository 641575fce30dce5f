//! # Shell Error Type
//!
//! Unified error type for the menu shell.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Shell                              │
//! │                                                                         │
//! │  Menu operation                                                         │
//! │       │                                                                 │
//! │       ├── CoreError (bad field, unknown id, stock) ──┐                  │
//! │       ├── LedgerError::Rejected ─────────────────────┤                  │
//! │       ├── DbError / LedgerError::Storage ────────────┼──► CliError      │
//! │       ├── ConfigError (startup only) ────────────────┤                  │
//! │       └── io::Error (stdin/stdout) ──────────────────┘                  │
//! │                                                                         │
//! │  CliError::is_fatal()?                                                  │
//! │       ├── no  → "Error: <message>" printed, back to the menu           │
//! │       └── yes → shell stops, process exits 1                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use bookstore_core::{CoreError, ErrorKind};
use bookstore_db::{DbError, LedgerError};

use crate::config::ConfigError;

/// Error surfaced by the shell.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct CliError {
    /// Machine-readable category
    pub code: ErrorCode,

    /// Human-readable message printed to the operator
    pub message: String,
}

/// Error categories for shell output and exit handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Malformed date, quantity, discount or selection
    InvalidInput,

    /// Unknown member or book id
    InvalidReference,

    /// Quantity exceeds stock
    InsufficientStock,

    /// Sale or selection not found
    NotFound,

    /// Storage operation failed
    DatabaseError,

    /// Configuration could not be loaded
    ConfigError,

    /// Reading input or writing output failed
    IoError,
}

impl CliError {
    /// Creates a new shell error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    /// Whether the shell should stop rather than return to the menu.
    pub fn is_fatal(&self) -> bool {
        matches!(self.code, ErrorCode::IoError | ErrorCode::ConfigError)
    }
}

/// Converts core errors to shell errors.
impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let code = match err.kind() {
            ErrorKind::InvalidInput => ErrorCode::InvalidInput,
            ErrorKind::InvalidReference => ErrorCode::InvalidReference,
            ErrorKind::InsufficientStock => ErrorCode::InsufficientStock,
            ErrorKind::NotFound => ErrorCode::NotFound,
        };
        CliError::new(code, err.to_string())
    }
}

/// Converts database errors to shell errors.
impl From<DbError> for CliError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                CliError::new(ErrorCode::NotFound, format!("{entity} not found: {id}"))
            }
            DbError::ConnectionFailed(e) => {
                CliError::new(ErrorCode::DatabaseError, format!("Database connection failed: {e}"))
            }
            DbError::BootstrapFailed(e) => {
                tracing::error!("Schema bootstrap failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database setup failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but show a generic message
                tracing::error!("Database query failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                CliError::new(ErrorCode::DatabaseError, "Database is busy, try again")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts sales engine errors to shell errors.
impl From<LedgerError> for CliError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Rejected(e) => e.into(),
            LedgerError::Storage(e) => e.into(),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::new(ErrorCode::IoError, format!("I/O error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_codes() {
        let err: CliError = CoreError::unknown("member", "M999").into();
        assert_eq!(err.code, ErrorCode::InvalidReference);
        assert_eq!(err.message, "Unknown member id: M999");
        assert!(!err.is_fatal());

        let err: CliError = CoreError::SelectionOutOfRange {
            choice: 9,
            available: 4,
        }
        .into();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_ledger_error_unwraps_to_inner_code() {
        let err: CliError = LedgerError::Rejected(CoreError::SaleNotFound(7)).into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: CliError = LedgerError::Storage(DbError::PoolExhausted).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_io_error_is_fatal() {
        let err: CliError = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed").into();
        assert!(err.is_fatal());
    }
}
