//! # bookstore-db: Database Layer for the Bookstore Ledger
//!
//! This crate provides database access and the sales engine.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Bookstore Ledger Data Flow                         │
//! │                                                                         │
//! │  Menu choice (1 = create sale)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  bookstore-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │    Schema    │  │   │
//! │  │   │   (pool.rs)   │    │               │    │ (schema.rs)  │  │   │
//! │  │   │               │    │ MemberRepo    │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ BookRepo      │    │ member/book/ │  │   │
//! │  │   │ StockPolicy   │    │ SaleRepo ★    │    │ sale + seed  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                     ./bookstore.db                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ★ `SaleRepository` is the sales engine: every create, update and delete
//! runs as one transaction that keeps `sale.stotal` and `book.bstock`
//! consistent.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`schema`] - Table bootstrap and seed data
//! - [`error`] - Database and engine error types
//! - [`repository`] - Member, book and sale repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bookstore_core::NewSale;
//! use bookstore_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("bookstore.db")).await?;
//!
//! let request = NewSale::new("2024-02-01", "M001", "B001", 5, 50)?;
//! let sale = db.sales().create_sale(&request).await?;
//! assert_eq!(sale.total, 2950);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod pool;
pub mod repository;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, LedgerError, LedgerResult};
pub use pool::{Database, DbConfig};
pub use schema::BootstrapOutcome;

// Repository re-exports for convenience
pub use repository::book::BookRepository;
pub use repository::member::MemberRepository;
pub use repository::sale::SaleRepository;
