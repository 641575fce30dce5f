//! # Error Types
//!
//! Domain-specific error types for bookstore-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bookstore-core errors (this file)                                     │
//! │  ├── CoreError        - Rejections of a sale operation                 │
//! │  └── ValidationError  - Malformed field input                          │
//! │                                                                         │
//! │  bookstore-db errors (separate crate)                                  │
//! │  ├── DbError          - Storage failures                               │
//! │  └── LedgerError      - CoreError | DbError from engine operations     │
//! │                                                                         │
//! │  bookstore-cli errors (in app)                                         │
//! │  └── CliError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → LedgerError → CliError → console  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every `CoreError` belongs to exactly one [`ErrorKind`]. The shell uses the
//! kind to decide between re-prompting a field and returning to the menu.

use thiserror::Error;

// =============================================================================
// Error Kind
// =============================================================================

/// The four ways a sale operation can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed date, quantity, discount or selection text.
    InvalidInput,
    /// Member or book id that does not exist.
    InvalidReference,
    /// Requested quantity exceeds the book's stock.
    InsufficientStock,
    /// Sale missing, or selection outside the listed range.
    NotFound,
}

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by sale operations.
///
/// None of these are fatal. They are reported to the operator, who then
/// corrects the offending field or picks another menu entry.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A field failed validation.
    #[error("{0}")]
    InvalidInput(#[from] ValidationError),

    /// A member or book id does not match any stored row.
    ///
    /// ## When This Occurs
    /// - Operator typed an unknown member id (e.g. `M999`)
    /// - Operator typed an unknown book id (e.g. `B999`)
    #[error("Unknown {entity} id: {id}")]
    InvalidReference { entity: String, id: String },

    /// Not enough copies to fulfil the sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Quantity: 999
    ///      │
    ///      ▼
    /// Check stock: available=30
    ///      │
    ///      ▼
    /// InsufficientStock { book_id: "B002", available: 30, requested: 999 }
    ///      │
    ///      ▼
    /// Shell prints the message and asks for the quantity again
    /// ```
    #[error("Insufficient stock for {book_id}: available {available}, requested {requested}")]
    InsufficientStock {
        book_id: String,
        available: i64,
        requested: i64,
    },

    /// The sale row no longer exists.
    #[error("Sale not found: {0}")]
    SaleNotFound(i64),

    /// The operator picked a position outside the listed sales.
    #[error("Selection {choice} is out of range (1-{available})")]
    SelectionOutOfRange { choice: usize, available: usize },

    /// There is nothing to select from.
    #[error("There are no sales to select")]
    EmptyLedger,
}

impl CoreError {
    /// Creates an InvalidReference error for a given entity type and id.
    pub fn unknown(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CoreError::InvalidReference {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidInput(_) => ErrorKind::InvalidInput,
            CoreError::InvalidReference { .. } => ErrorKind::InvalidReference,
            CoreError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            CoreError::SaleNotFound(_)
            | CoreError::SelectionOutOfRange { .. }
            | CoreError::EmptyLedger => ErrorKind::NotFound,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are raised before any storage is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be a positive integer")]
    MustBePositive { field: String },

    /// Value must be zero or more.
    #[error("{field} must be a non-negative integer")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g. a date with the separators in the wrong place).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            book_id: "B002".to_string(),
            available: 30,
            requested: 999,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for B002: available 30, requested 999"
        );

        let err = CoreError::unknown("member", "M999");
        assert_eq!(err.to_string(), "Unknown member id: M999");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be a positive integer");

        let err = ValidationError::MustBeNonNegative {
            field: "discount".to_string(),
        };
        assert_eq!(err.to_string(), "discount must be a non-negative integer");
    }

    #[test]
    fn test_validation_converts_to_invalid_input() {
        let validation_err = ValidationError::Required {
            field: "member id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert_eq!(core_err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(CoreError::unknown("book", "B9").kind(), ErrorKind::InvalidReference);
        assert_eq!(CoreError::SaleNotFound(7).kind(), ErrorKind::NotFound);
        assert_eq!(CoreError::EmptyLedger.kind(), ErrorKind::NotFound);
        assert_eq!(
            CoreError::SelectionOutOfRange { choice: 9, available: 4 }.kind(),
            ErrorKind::NotFound
        );
    }
}
