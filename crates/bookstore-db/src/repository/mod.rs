//! # Repository Module
//!
//! Database repository implementations for the bookstore ledger.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  Menu shell                                                            │
//! │       │                                                                 │
//! │       │  db.sales().create_sale(&request)                              │
//! │       ▼                                                                 │
//! │  SaleRepository  (sales engine)                                        │
//! │  ├── list_ledger / get_by_id / count                                   │
//! │  ├── create_sale      ─┐                                               │
//! │  ├── update_discount   ├── one transaction each                        │
//! │  ├── delete_sale      ─┘                                               │
//! │  └── audit_totals                                                      │
//! │       │                                                                 │
//! │       │  shares lookups with                                           │
//! │       ▼                                                                 │
//! │  MemberRepository / BookRepository  (read only)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each lookup exists twice: as a repository method over the pool, and as a
//! crate-private function over a `&mut SqliteConnection` so the engine can
//! run it inside its own transaction.
//!
//! ## Available Repositories
//!
//! - [`member::MemberRepository`] - Member lookups
//! - [`book::BookRepository`] - Book lookups
//! - [`sale::SaleRepository`] - Ledger reads and the sale lifecycle

pub mod book;
pub mod member;
pub mod sale;
