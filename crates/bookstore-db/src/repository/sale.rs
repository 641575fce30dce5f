//! # Sale Repository
//!
//! The sales engine: ledger reads plus the create, update and delete
//! operations that keep `sale.stotal` and `book.bstock` consistent.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Sale Lifecycle                                  │
//! │                                                                         │
//! │  create_sale(NewSale)                                                  │
//! │    BEGIN                                                                │
//! │    ├── member exists?          no → InvalidReference                   │
//! │    ├── book exists?            no → InvalidReference                   │
//! │    ├── stock >= quantity?      no → InsufficientStock                  │
//! │    ├── INSERT sale (total = price × qty − discount)                    │
//! │    └── UPDATE book stock −= qty                                        │
//! │    COMMIT                                                               │
//! │                                                                         │
//! │  update_discount(sale_id, discount)                                    │
//! │    BEGIN                                                                │
//! │    ├── sale exists?            no → SaleNotFound                       │
//! │    ├── total = CURRENT price × qty − discount                          │
//! │    └── UPDATE sale discount, total   (stock untouched)                 │
//! │    COMMIT                                                               │
//! │                                                                         │
//! │  delete_sale(sale_id)                                                  │
//! │    BEGIN                                                                │
//! │    ├── sale exists?            no → SaleNotFound                       │
//! │    ├── DELETE sale                                                     │
//! │    └── restore stock           only if StockPolicy says so             │
//! │    COMMIT                                                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every rejection returns before `commit`, so the dropped transaction
//! rolls back and nothing is written.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult, LedgerResult};
use crate::repository::{book, member};
use bookstore_core::validation::{check_stock, validate_discount};
use bookstore_core::{
    sale_total, CoreError, LedgerRow, Money, NewSale, Sale, StockPolicy, TotalDiscrepancy,
};

const SELECT_SALE: &str = "SELECT sid AS id, sdate AS date, mid AS member_id, bid AS book_id, \
     sqty AS quantity, sdiscount AS discount, stotal AS total FROM sale";

const SELECT_LEDGER: &str = r#"
    SELECT
        s.sid       AS id,
        s.sdate     AS date,
        m.mname     AS member_name,
        b.btitle    AS book_title,
        b.bprice    AS price,
        s.sqty      AS quantity,
        s.sdiscount AS discount,
        s.stotal    AS total
    FROM sale s
    JOIN member m ON s.mid = m.mid
    JOIN book b ON s.bid = b.bid
    ORDER BY s.sid
"#;

/// A stored sale alongside its book's current price.
#[derive(Debug, sqlx::FromRow)]
struct PricedSale {
    #[sqlx(flatten)]
    sale: Sale,
    current_price: i64,
}

/// Repository for sale operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.sales();
///
/// let request = NewSale::new("2024-02-01", "M001", "B001", 5, 50)?;
/// let sale = repo.create_sale(&request).await?;
///
/// repo.update_discount(sale.id, 0).await?;
/// repo.delete_sale(sale.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
    policy: StockPolicy,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool, policy: StockPolicy) -> Self {
        SaleRepository { pool, policy }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Every sale joined with its member name, book title and current
    /// price, in ascending sale id order.
    ///
    /// A sale whose member or book row no longer exists is left out.
    /// The report and the update/delete selection menus both render
    /// this list.
    pub async fn list_ledger(&self) -> DbResult<Vec<LedgerRow>> {
        let rows = sqlx::query_as::<_, LedgerRow>(SELECT_LEDGER)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Loaded ledger");
        Ok(rows)
    }

    /// Gets a sale by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let mut conn = self.pool.acquire().await?;
        let sale = find_by_id(&mut conn, id).await?;
        Ok(sale)
    }

    /// Number of sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Sales whose stored total differs from what the book's current
    /// price would give. Read only.
    pub async fn audit_totals(&self) -> DbResult<Vec<TotalDiscrepancy>> {
        let priced = sqlx::query_as::<_, PricedSale>(
            r#"
            SELECT
                s.sid       AS id,
                s.sdate     AS date,
                s.mid       AS member_id,
                s.bid       AS book_id,
                s.sqty      AS quantity,
                s.sdiscount AS discount,
                s.stotal    AS total,
                b.bprice    AS current_price
            FROM sale s
            JOIN book b ON s.bid = b.bid
            ORDER BY s.sid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let drifted: Vec<TotalDiscrepancy> = priced
            .iter()
            .filter_map(|p| TotalDiscrepancy::check(&p.sale, Money::from_minor(p.current_price)))
            .collect();

        if !drifted.is_empty() {
            warn!(count = drifted.len(), "Stored totals out of step with book prices");
        }
        Ok(drifted)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Records a sale and draws down the book's stock.
    ///
    /// ## Errors
    /// * `InvalidReference` - unknown member or book id
    /// * `InsufficientStock` - quantity exceeds the book's stock
    /// * `Storage` - the database failed; nothing was written
    pub async fn create_sale(&self, request: &NewSale) -> LedgerResult<Sale> {
        let mut tx = self.pool.begin().await?;

        if member::find_by_id(&mut tx, &request.member_id).await?.is_none() {
            warn!(member_id = %request.member_id, "Sale rejected: unknown member");
            return Err(CoreError::unknown("member", &request.member_id).into());
        }

        let Some(book) = book::find_by_id(&mut tx, &request.book_id).await? else {
            warn!(book_id = %request.book_id, "Sale rejected: unknown book");
            return Err(CoreError::unknown("book", &request.book_id).into());
        };

        if let Err(err) = check_stock(&book, request.quantity) {
            warn!(
                book_id = %book.id,
                stock = book.stock,
                quantity = request.quantity,
                "Sale rejected: insufficient stock"
            );
            return Err(err.into());
        }

        let total = request.total_at(book.price());

        let result = sqlx::query(
            "INSERT INTO sale (sdate, mid, bid, sqty, sdiscount, stotal) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(request.date.as_str())
        .bind(&request.member_id)
        .bind(&request.book_id)
        .bind(request.quantity)
        .bind(request.discount)
        .bind(total.minor())
        .execute(&mut *tx)
        .await?;

        let sale_id = result.last_insert_rowid();

        book::adjust_stock(&mut tx, &book.id, -request.quantity).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            sale_id,
            book_id = %book.id,
            quantity = request.quantity,
            total = total.minor(),
            "Sale recorded"
        );

        Ok(Sale {
            id: sale_id,
            date: request.date.as_str().to_string(),
            member_id: request.member_id.clone(),
            book_id: book.id,
            quantity: request.quantity,
            discount: request.discount,
            total: total.minor(),
        })
    }

    /// Replaces a sale's discount and recomputes its total from the
    /// book's current price. Quantity and stock are unchanged.
    ///
    /// ## Errors
    /// * `InvalidInput` - negative discount
    /// * `SaleNotFound` - no sale with this id
    /// * `InvalidReference` - the sale's book row is gone
    pub async fn update_discount(&self, sale_id: i64, discount: i64) -> LedgerResult<Sale> {
        validate_discount(discount)?;

        let mut tx = self.pool.begin().await?;

        let Some(sale) = find_by_id(&mut tx, sale_id).await? else {
            warn!(sale_id, "Sale not found");
            return Err(CoreError::SaleNotFound(sale_id).into());
        };

        let book = book::find_by_id(&mut tx, &sale.book_id)
            .await?
            .ok_or_else(|| CoreError::unknown("book", &sale.book_id))?;

        let total = sale_total(book.price(), sale.quantity, Money::from_minor(discount));

        sqlx::query("UPDATE sale SET sdiscount = ?2, stotal = ?3 WHERE sid = ?1")
            .bind(sale_id)
            .bind(discount)
            .bind(total.minor())
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(sale_id, discount, total = total.minor(), "Sale updated");

        Ok(Sale {
            discount,
            total: total.minor(),
            ..sale
        })
    }

    /// Removes a sale and returns the row as it was.
    ///
    /// Book stock comes back only when the repository's
    /// [`StockPolicy::restore_on_delete`] is set.
    ///
    /// ## Errors
    /// * `SaleNotFound` - no sale with this id
    pub async fn delete_sale(&self, sale_id: i64) -> LedgerResult<Sale> {
        let mut tx = self.pool.begin().await?;

        let Some(sale) = find_by_id(&mut tx, sale_id).await? else {
            warn!(sale_id, "Sale not found");
            return Err(CoreError::SaleNotFound(sale_id).into());
        };

        sqlx::query("DELETE FROM sale WHERE sid = ?1")
            .bind(sale_id)
            .execute(&mut *tx)
            .await?;

        if self.policy.restore_on_delete {
            let touched = book::adjust_stock(&mut tx, &sale.book_id, sale.quantity).await?;
            if touched == 0 {
                warn!(sale_id, book_id = %sale.book_id, "Book missing; stock not restored");
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            sale_id,
            restored = self.policy.restore_on_delete,
            "Sale deleted"
        );
        Ok(sale)
    }
}

/// Sale lookup on an already-acquired connection.
pub(crate) async fn find_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Sale>, sqlx::Error> {
    sqlx::query_as::<_, Sale>(&format!("{SELECT_SALE} WHERE sid = ?1"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

// =============================================================================
// Unit Tests
// =============================================================================
