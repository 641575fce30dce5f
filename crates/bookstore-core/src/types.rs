//! # Domain Types
//!
//! Core domain types used throughout the bookstore ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Member      │   │      Book       │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id ("M001")    │◄──┤                 │◄──┤  id (autoinc)   │       │
//! │  │  name           │   │  id ("B001")    │   │  member_id (FK) │       │
//! │  │  phone          │   │  title          │   │  book_id (FK)   │       │
//! │  │  email?         │   │  price, stock   │   │  qty, discount  │       │
//! │  └─────────────────┘   └─────────────────┘   │  total (frozen) │       │
//! │                                              └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    NewSale      │   │   LedgerRow     │   │ TotalDiscrepancy│       │
//! │  │  validated      │   │  Sale ⋈ Member  │   │  stored vs      │       │
//! │  │  create request │   │       ⋈ Book    │   │  recomputed     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Denormalized Total
//! `Sale::total` is written once at creation (and again on a discount
//! update). It is not a live join, so it keeps the price that applied when
//! it was written. [`TotalDiscrepancy`] reports rows where it has drifted
//! from the current book price.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::money::Money;
use crate::validation;

// =============================================================================
// Pricing
// =============================================================================

/// Computes `price * quantity - discount`.
///
/// No floor is applied: a discount larger than the line amount produces a
/// negative total, and that value is stored unchanged.
#[inline]
pub fn sale_total(price: Money, quantity: i64, discount: Money) -> Money {
    price.multiply_quantity(quantity) - discount
}

// =============================================================================
// Member
// =============================================================================

/// A registered customer. Read-only in this tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Member {
    /// Business identifier (e.g. "M001").
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

// =============================================================================
// Book
// =============================================================================

/// A title on the shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Book {
    /// Business identifier (e.g. "B001").
    pub id: String,

    /// Display title shown in the ledger.
    pub title: String,

    /// Current unit price in minor units.
    pub price: i64,

    /// Remaining sellable copies.
    pub stock: i64,
}

impl Book {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_minor(self.price)
    }

    /// Checks whether `quantity` copies can be sold.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity <= self.stock
    }
}

// =============================================================================
// Sale Date
// =============================================================================

/// A sale date that passed the `YYYY-MM-DD` shape check.
///
/// Only the shape is checked. `2024-02-31` is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleDate(String);

impl SaleDate {
    /// Validates and wraps a date string.
    pub fn parse(input: &str) -> CoreResult<Self> {
        let input = input.trim();
        validation::validate_sale_date(input)?;
        Ok(SaleDate(input.to_string()))
    }

    /// Today's local date, used as the example in the date prompt.
    pub fn today() -> Self {
        SaleDate(Local::now().format("%Y-%m-%d").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SaleDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A stored sale row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub date: String,
    pub member_id: String,
    pub book_id: String,
    pub quantity: i64,
    pub discount: i64,
    /// Total written at creation or last discount update.
    pub total: i64,
}

impl Sale {
    /// Returns the stored total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_minor(self.total)
    }

    /// Returns the discount as Money.
    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_minor(self.discount)
    }

    /// Recomputes the total against a (possibly changed) book price.
    #[inline]
    pub fn total_at(&self, price: Money) -> Money {
        sale_total(price, self.quantity, self.discount())
    }
}

// =============================================================================
// New Sale
// =============================================================================

/// A create request whose fields have all passed validation.
///
/// Member and book existence and stock are checked later against storage;
/// this type only guarantees the field shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    pub date: SaleDate,
    pub member_id: String,
    pub book_id: String,
    pub quantity: i64,
    pub discount: i64,
}

impl NewSale {
    /// Validates every field of a create request.
    ///
    /// ## Example
    /// ```rust
    /// use bookstore_core::NewSale;
    ///
    /// let sale = NewSale::new("2024-02-01", "M001", "B001", 5, 50).unwrap();
    /// assert_eq!(sale.quantity, 5);
    ///
    /// assert!(NewSale::new("2024/02/01", "M001", "B001", 5, 50).is_err());
    /// assert!(NewSale::new("2024-02-01", "M001", "B001", 0, 50).is_err());
    /// assert!(NewSale::new("2024-02-01", "M001", "B001", 5, -1).is_err());
    /// ```
    pub fn new(
        date: &str,
        member_id: &str,
        book_id: &str,
        quantity: i64,
        discount: i64,
    ) -> CoreResult<Self> {
        let date = SaleDate::parse(date)?;
        let member_id = validation::validate_entity_id("member id", member_id)?;
        let book_id = validation::validate_entity_id("book id", book_id)?;
        validation::validate_quantity(quantity)?;
        validation::validate_discount(discount)?;

        Ok(NewSale {
            date,
            member_id,
            book_id,
            quantity,
            discount,
        })
    }

    /// Total for this request at the given unit price.
    #[inline]
    pub fn total_at(&self, price: Money) -> Money {
        sale_total(price, self.quantity, Money::from_minor(self.discount))
    }
}

// =============================================================================
// Ledger Row
// =============================================================================

/// One line of the ledger: a sale joined with its member and book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LedgerRow {
    pub id: i64,
    pub date: String,
    pub member_name: String,
    pub book_title: String,
    /// Current book price (from the join, not frozen).
    pub price: i64,
    pub quantity: i64,
    pub discount: i64,
    /// Stored total.
    pub total: i64,
}

impl LedgerRow {
    /// `price * quantity - discount` recomputed for display.
    ///
    /// Equals [`LedgerRow::total`] unless the book price changed after the
    /// sale was last written.
    #[inline]
    pub fn subtotal(&self) -> Money {
        sale_total(
            Money::from_minor(self.price),
            self.quantity,
            Money::from_minor(self.discount),
        )
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_minor(self.total)
    }
}

// =============================================================================
// Audit
// =============================================================================

/// A sale whose stored total no longer matches the current book price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalDiscrepancy {
    pub sale_id: i64,
    pub stored: Money,
    pub recomputed: Money,
}

impl TotalDiscrepancy {
    /// Compares a sale against a current price; `None` when they agree.
    pub fn check(sale: &Sale, current_price: Money) -> Option<Self> {
        let recomputed = sale.total_at(current_price);
        (recomputed != sale.total()).then(|| TotalDiscrepancy {
            sale_id: sale.id,
            stored: sale.total(),
            recomputed,
        })
    }
}

// =============================================================================
// Stock Policy
// =============================================================================

/// How sale deletion interacts with book stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StockPolicy {
    /// Add the sale's quantity back to the book when the sale is deleted.
    /// Off by default: deletion only removes the ledger row.
    pub restore_on_delete: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ErrorKind};

    fn sale(total: i64) -> Sale {
        Sale {
            id: 1,
            date: "2024-01-15".to_string(),
            member_id: "M001".to_string(),
            book_id: "B001".to_string(),
            quantity: 2,
            discount: 100,
            total,
        }
    }

    #[test]
    fn test_sale_total() {
        let total = sale_total(Money::from_minor(600), 5, Money::from_minor(50));
        assert_eq!(total.minor(), 2950);
    }

    #[test]
    fn test_sale_total_may_go_negative() {
        let total = sale_total(Money::from_minor(600), 1, Money::from_minor(1000));
        assert_eq!(total.minor(), -400);
    }

    #[test]
    fn test_book_can_sell() {
        let book = Book {
            id: "B002".to_string(),
            title: "Data Science Basics".to_string(),
            price: 800,
            stock: 30,
        };
        assert!(book.can_sell(30));
        assert!(!book.can_sell(31));
    }

    #[test]
    fn test_sale_date_parse_trims() {
        let date = SaleDate::parse(" 2024-02-01 ").unwrap();
        assert_eq!(date.as_str(), "2024-02-01");
    }

    #[test]
    fn test_today_has_date_shape() {
        assert!(SaleDate::parse(SaleDate::today().as_str()).is_ok());
    }

    #[test]
    fn test_new_sale_rejects_bad_fields() {
        let err = NewSale::new("2024-02-01", "", "B001", 1, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = NewSale::new("20240201", "M001", "B001", 1, 0).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_ledger_row_subtotal_tracks_current_price() {
        let row = LedgerRow {
            id: 1,
            date: "2024-01-15".to_string(),
            member_name: "Alice".to_string(),
            book_title: "Python Programming".to_string(),
            price: 700,
            quantity: 2,
            discount: 100,
            total: 1100,
        };
        assert_eq!(row.subtotal().minor(), 1300);
        assert_eq!(row.total().minor(), 1100);
    }

    #[test]
    fn test_discrepancy_check() {
        assert!(TotalDiscrepancy::check(&sale(1100), Money::from_minor(600)).is_none());

        let found = TotalDiscrepancy::check(&sale(1100), Money::from_minor(650)).unwrap();
        assert_eq!(found.sale_id, 1);
        assert_eq!(found.stored.minor(), 1100);
        assert_eq!(found.recomputed.minor(), 1200);
    }

    #[test]
    fn test_stock_policy_default_keeps_stock() {
        assert!(!StockPolicy::default().restore_on_delete);
    }
}
