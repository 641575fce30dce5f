//! # bookstore-core: Pure Business Logic for the Bookstore Ledger
//!
//! This crate holds the rules that every sale has to satisfy, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Bookstore Ledger Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Menu Shell (bookstore-cli)                   │   │
//! │  │    1 Create ──► 2 Report ──► 3 Update ──► 4 Delete ──► 5 Exit   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ bookstore-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌──────────┐   │   │
//! │  │   │   types   │  │   money   │  │ validation │  │  report  │   │   │
//! │  │   │  Member   │  │   Money   │  │ date, qty  │  │  ledger  │   │   │
//! │  │   │  Book     │  │  totals   │  │ discount   │  │ listing  │   │   │
//! │  │   │  Sale     │  │           │  │ selection  │  │          │   │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └──────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CONSOLE • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 bookstore-db (Database Layer)                   │   │
//! │  │        SQLite schema, repositories, transactional engine        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Member, Book, Sale, LedgerRow, ...)
//! - [`money`] - Integer money in minor units
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation and stock/selection rules
//! - [`report`] - Ledger and selection-menu rendering
//!
//! ## Example Usage
//!
//! ```rust
//! use bookstore_core::money::Money;
//! use bookstore_core::types::sale_total;
//!
//! // 5 copies at 600 with a flat discount of 50
//! let total = sale_total(Money::from_minor(600), 5, Money::from_minor(50));
//! assert_eq!(total.minor(), 2950);
//! assert_eq!(total.to_string(), "2,950");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Human-readable shape of a sale date, used in prompts and messages.
pub const DATE_FORMAT_HINT: &str = "YYYY-MM-DD";

/// Exact length of a well-formed sale date.
pub const DATE_LEN: usize = 10;

/// Byte positions of the two `-` separators in a sale date.
pub const DATE_SEPARATOR_POSITIONS: [usize; 2] = [4, 7];
