//! # Book Repository
//!
//! Read access to books. Stock is only ever written by the sales engine
//! (`repository::sale`), through the crate-private helpers at the bottom of
//! this file.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use bookstore_core::Book;

const SELECT_BOOK: &str =
    "SELECT bid AS id, btitle AS title, bprice AS price, bstock AS stock FROM book";

/// Repository for book lookups.
///
/// ## Usage
/// ```rust,ignore
/// let book = db.books().get_by_id("B001").await?;
/// assert_eq!(book.map(|b| b.stock), Some(50));
/// ```
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    /// Creates a new BookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    /// Gets a book by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Book>> {
        let mut conn = self.pool.acquire().await?;
        let book = find_by_id(&mut conn, id).await?;
        debug!(id = %id, found = book.is_some(), "Book lookup");
        Ok(book)
    }

    /// Lists all books ordered by id.
    pub async fn list(&self) -> DbResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!("{SELECT_BOOK} ORDER BY bid"))
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    /// Number of books.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Connection-level helpers (used inside sale transactions)
// =============================================================================

/// Book lookup on an already-acquired connection.
pub(crate) async fn find_by_id(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<Option<Book>, sqlx::Error> {
    sqlx::query_as::<_, Book>(&format!("{SELECT_BOOK} WHERE bid = ?1"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Adds `delta` to a book's stock (negative to draw down).
///
/// Returns the number of rows touched.
pub(crate) async fn adjust_stock(
    conn: &mut SqliteConnection,
    id: &str,
    delta: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE book SET bstock = bstock + ?2 WHERE bid = ?1")
        .bind(id)
        .bind(delta)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}
