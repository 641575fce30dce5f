//! # Schema Bootstrap
//!
//! Creates the ledger tables and inserts the demo rows on first run.
//!
//! ## How Bootstrap Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Bootstrap Process                                  │
//! │                                                                         │
//! │  Shell startup                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Look up member, book, sale in sqlite_master                           │
//! │       │                                                                 │
//! │       ├── All three present? ──► AlreadyPresent (nothing written)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │   ├── CREATE TABLE IF NOT EXISTS × 3                                   │
//! │   ├── seed members  (INSERT OR IGNORE)                                 │
//! │   ├── seed books    (INSERT OR IGNORE)                                 │
//! │   └── seed sales    (only when the sale table was just created)       │
//! │  COMMIT ──► Seeded                                                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The existence check gates the whole block, so running it twice never
//! duplicates a seed row.
//!
//! Column names are the short legacy ones (`mid`, `bprice`, `sqty`, ...);
//! repositories alias them onto struct fields.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// Tables the ledger needs, in creation order.
pub const TABLES: [&str; 3] = ["member", "book", "sale"];

const CREATE_MEMBER: &str = r#"
    CREATE TABLE IF NOT EXISTS member (
        mid    TEXT PRIMARY KEY,
        mname  TEXT NOT NULL,
        mphone TEXT NOT NULL,
        memail TEXT
    )
"#;

const CREATE_BOOK: &str = r#"
    CREATE TABLE IF NOT EXISTS book (
        bid    TEXT PRIMARY KEY,
        btitle TEXT NOT NULL,
        bprice INTEGER NOT NULL,
        bstock INTEGER NOT NULL
    )
"#;

const CREATE_SALE: &str = r#"
    CREATE TABLE IF NOT EXISTS sale (
        sid       INTEGER PRIMARY KEY AUTOINCREMENT,
        sdate     TEXT NOT NULL,
        mid       TEXT NOT NULL,
        bid       TEXT NOT NULL,
        sqty      INTEGER NOT NULL,
        sdiscount INTEGER NOT NULL,
        stotal    INTEGER NOT NULL
    )
"#;

// =============================================================================
// Seed Data
// =============================================================================

/// Seed members: (id, name, phone, email).
pub const SEED_MEMBERS: [(&str, &str, &str, &str); 3] = [
    ("M001", "Alice", "0912-345678", "alice@example.com"),
    ("M002", "Bob", "0923-456789", "bob@example.com"),
    ("M003", "Cathy", "0934-567890", "cathy@example.com"),
];

/// Seed books: (id, title, price, stock).
pub const SEED_BOOKS: [(&str, &str, i64, i64); 3] = [
    ("B001", "Python Programming", 600, 50),
    ("B002", "Data Science Basics", 800, 30),
    ("B003", "Machine Learning Guide", 1200, 20),
];

/// Seed sales: (date, member id, book id, quantity, discount, total).
///
/// These do not draw down the seed stock above.
pub const SEED_SALES: [(&str, &str, &str, i64, i64, i64); 4] = [
    ("2024-01-15", "M001", "B001", 2, 100, 1100),
    ("2024-01-16", "M002", "B002", 1, 50, 750),
    ("2024-01-17", "M001", "B003", 3, 200, 3400),
    ("2024-01-18", "M003", "B001", 1, 0, 600),
];

/// What [`bootstrap`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Tables were created and seed rows inserted.
    Seeded,
    /// Every table already existed; nothing was written.
    AlreadyPresent,
}

// =============================================================================
// Bootstrap
// =============================================================================

/// Returns true if a table with this name exists.
pub async fn table_exists(pool: &SqlitePool, name: &str) -> DbResult<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1")
            .bind(name)
            .fetch_one(pool)
            .await?;

    Ok(count > 0)
}

/// Names of the ledger tables that do not exist yet.
pub async fn missing_tables(pool: &SqlitePool) -> DbResult<Vec<&'static str>> {
    let mut missing = Vec::new();
    for table in TABLES {
        if !table_exists(pool, table).await? {
            missing.push(table);
        }
    }
    Ok(missing)
}

/// Ensures the schema exists, seeding it when any table was missing.
///
/// ## Example
/// ```rust,ignore
/// assert_eq!(bootstrap(&pool).await?, BootstrapOutcome::Seeded);
/// assert_eq!(bootstrap(&pool).await?, BootstrapOutcome::AlreadyPresent);
/// ```
pub async fn bootstrap(pool: &SqlitePool) -> DbResult<BootstrapOutcome> {
    let missing = missing_tables(pool).await?;
    if missing.is_empty() {
        debug!("Ledger tables already present");
        return Ok(BootstrapOutcome::AlreadyPresent);
    }

    info!(?missing, "Creating ledger tables");

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

    for ddl in [CREATE_MEMBER, CREATE_BOOK, CREATE_SALE] {
        sqlx::query(ddl)
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::BootstrapFailed(e.to_string()))?;
    }

    seed(&mut *tx, missing.contains(&"sale"))
        .await
        .map_err(|e| DbError::BootstrapFailed(e.to_string()))?;

    tx.commit()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

    info!(
        members = SEED_MEMBERS.len(),
        books = SEED_BOOKS.len(),
        "Seed data inserted"
    );
    Ok(BootstrapOutcome::Seeded)
}

async fn seed(conn: &mut SqliteConnection, with_sales: bool) -> Result<(), sqlx::Error> {
    for (id, name, phone, email) in SEED_MEMBERS {
        sqlx::query("INSERT OR IGNORE INTO member (mid, mname, mphone, memail) VALUES (?1, ?2, ?3, ?4)")
            .bind(id)
            .bind(name)
            .bind(phone)
            .bind(email)
            .execute(&mut *conn)
            .await?;
    }

    for (id, title, price, stock) in SEED_BOOKS {
        sqlx::query("INSERT OR IGNORE INTO book (bid, btitle, bprice, bstock) VALUES (?1, ?2, ?3, ?4)")
            .bind(id)
            .bind(title)
            .bind(price)
            .bind(stock)
            .execute(&mut *conn)
            .await?;
    }

    // An existing sale table keeps its rows; re-seeding would duplicate them.
    if with_sales {
        for (date, member_id, book_id, qty, discount, total) in SEED_SALES {
            sqlx::query(
                "INSERT INTO sale (sdate, mid, bid, sqty, sdiscount, stotal) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(date)
            .bind(member_id)
            .bind(book_id)
            .bind(qty)
            .bind(discount)
            .bind(total)
            .execute(&mut *conn)
            .await?;
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
