//! # Validation Module
//!
//! Input validation for the sale lifecycle.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Shell (bookstore-cli)                                        │
//! │  ├── Reads one field at a time                                         │
//! │  └── Re-prompts the same field on rejection                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (pure)                                           │
//! │  ├── Field shapes: date, quantity, discount, ids                       │
//! │  ├── Stock sufficiency against a loaded Book                           │
//! │  └── Position → index for the 1-indexed selection menu                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Sales engine (bookstore-db)                                  │
//! │  └── Re-checks references and stock inside the write transaction      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bookstore_core::validation::{parse_quantity, validate_sale_date};
//!
//! validate_sale_date("2024-02-01").unwrap();
//! assert_eq!(parse_quantity(" 5 ").unwrap(), 5);
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::Book;
use crate::{DATE_FORMAT_HINT, DATE_LEN, DATE_SEPARATOR_POSITIONS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates the shape of a sale date.
///
/// ## Rules
/// - Exactly 10 ASCII characters
/// - `-` at positions 4 and 7, digits everywhere else
/// - No calendar check: month 13 or day 31 of February pass
///
/// ## Example
/// ```rust
/// use bookstore_core::validation::validate_sale_date;
///
/// assert!(validate_sale_date("2024-01-15").is_ok());
/// assert!(validate_sale_date("2024-1-15").is_err());
/// assert!(validate_sale_date("2024/01/15").is_err());
/// ```
pub fn validate_sale_date(date: &str) -> ValidationResult<()> {
    if date.is_empty() {
        return Err(ValidationError::Required {
            field: "date".to_string(),
        });
    }

    if date.len() != DATE_LEN || !date.is_ascii() {
        return Err(invalid_date(format!("expected {DATE_FORMAT_HINT}")));
    }

    for (i, b) in date.bytes().enumerate() {
        let separator_slot = DATE_SEPARATOR_POSITIONS.contains(&i);
        if separator_slot && b != b'-' {
            return Err(invalid_date(format!("expected '-' at position {}", i + 1)));
        }
        if !separator_slot && !b.is_ascii_digit() {
            return Err(invalid_date(format!("expected {DATE_FORMAT_HINT}")));
        }
    }

    Ok(())
}

fn invalid_date(reason: String) -> ValidationError {
    ValidationError::InvalidFormat {
        field: "date".to_string(),
        reason,
    }
}

/// Validates a member or book id and returns it trimmed.
///
/// Existence is not checked here; that needs storage.
pub fn validate_entity_id(field: &str, id: &str) -> ValidationResult<String> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(id.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - No upper bound here; stock is the only limit
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a flat discount.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - May exceed the line amount
pub fn validate_discount(discount: i64) -> ValidationResult<()> {
    if discount < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "discount".to_string(),
        });
    }

    Ok(())
}

/// Parses and validates operator text for a quantity.
pub fn parse_quantity(input: &str) -> ValidationResult<i64> {
    let qty = input
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::MustBePositive {
            field: "quantity".to_string(),
        })?;
    validate_quantity(qty)?;
    Ok(qty)
}

/// Parses and validates operator text for a discount.
pub fn parse_discount(input: &str) -> ValidationResult<i64> {
    let discount = input
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::MustBeNonNegative {
            field: "discount".to_string(),
        })?;
    validate_discount(discount)?;
    Ok(discount)
}

// =============================================================================
// Business Rules
// =============================================================================

/// Checks that `book` has at least `quantity` copies left.
///
/// ## User Workflow
/// ```text
/// Book B002 (stock 30), quantity 999
///      │
///      ▼
/// check_stock ← THIS FUNCTION
///      │
///      └── 999 > 30 → InsufficientStock { available: 30, requested: 999 }
/// ```
pub fn check_stock(book: &Book, quantity: i64) -> CoreResult<()> {
    if !book.can_sell(quantity) {
        return Err(CoreError::InsufficientStock {
            book_id: book.id.clone(),
            available: book.stock,
            requested: quantity,
        });
    }

    Ok(())
}

/// Turns a 1-indexed menu choice into a 0-based index.
///
/// ## Errors
/// - `EmptyLedger` when there is nothing listed
/// - `InvalidInput` when the choice is not a number
/// - `SelectionOutOfRange` when it is outside `1..=available`
///
/// ## Example
/// ```rust
/// use bookstore_core::validation::select_position;
///
/// assert_eq!(select_position("2", 4).unwrap(), 1);
/// assert!(select_position("0", 4).is_err());
/// assert!(select_position("5", 4).is_err());
/// ```
pub fn select_position(choice: &str, available: usize) -> CoreResult<usize> {
    if available == 0 {
        return Err(CoreError::EmptyLedger);
    }

    let position = choice
        .trim()
        .parse::<usize>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "selection".to_string(),
            reason: format!("enter a number between 1 and {available}"),
        })?;

    if position == 0 || position > available {
        return Err(CoreError::SelectionOutOfRange {
            choice: position,
            available,
        });
    }

    Ok(position - 1)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_validate_sale_date() {
        assert!(validate_sale_date("2024-01-15").is_ok());
        // shape only, no calendar
        assert!(validate_sale_date("2024-02-31").is_ok());
        assert!(validate_sale_date("2024-13-01").is_ok());

        assert!(validate_sale_date("").is_err());
        assert!(validate_sale_date("2024-1-15").is_err());
        assert!(validate_sale_date("2024-01-155").is_err());
        assert!(validate_sale_date("2024/01/15").is_err());
        assert!(validate_sale_date("202-401-15").is_err());
        assert!(validate_sale_date("abcd-ef-gh").is_err());
        assert!(validate_sale_date("２０２４-01-1").is_err());
    }

    #[test]
    fn test_validate_entity_id() {
        assert_eq!(validate_entity_id("member id", " M001 ").unwrap(), "M001");
        assert!(validate_entity_id("member id", "   ").is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("1").unwrap(), 1);
        assert_eq!(parse_quantity("999").unwrap(), 999);

        assert!(parse_quantity("0").is_err());
        assert!(parse_quantity("-3").is_err());
        assert!(parse_quantity("two").is_err());
        assert!(parse_quantity("1.5").is_err());
    }

    #[test]
    fn test_parse_discount() {
        assert_eq!(parse_discount("0").unwrap(), 0);
        assert_eq!(parse_discount("5000").unwrap(), 5000);

        assert!(parse_discount("-1").is_err());
        assert!(parse_discount("").is_err());
    }

    #[test]
    fn test_check_stock() {
        let book = Book {
            id: "B002".to_string(),
            title: "Data Science Basics".to_string(),
            price: 800,
            stock: 30,
        };
        assert!(check_stock(&book, 30).is_ok());

        let err = check_stock(&book, 999).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
        assert!(err.to_string().contains("available 30"));
    }

    #[test]
    fn test_select_position() {
        assert_eq!(select_position("1", 4).unwrap(), 0);
        assert_eq!(select_position(" 4 ", 4).unwrap(), 3);

        assert_eq!(select_position("x", 4).unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(select_position("0", 4).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(select_position("5", 4).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(select_position("1", 0).unwrap_err().kind(), ErrorKind::NotFound);
    }
}
