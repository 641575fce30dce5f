//! End-to-end ledger scenarios against a seeded database.

use bookstore_core::report::{generate_report, Report};
use bookstore_core::{CoreError, ErrorKind, NewSale};
use bookstore_db::schema::{SEED_BOOKS, SEED_MEMBERS, SEED_SALES};
use bookstore_db::{BootstrapOutcome, Database, DbConfig, LedgerError};

async fn seeded() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

async fn stock_of(db: &Database, book_id: &str) -> i64 {
    db.books()
        .get_by_id(book_id)
        .await
        .unwrap()
        .expect("seed book")
        .stock
}

#[tokio::test]
async fn seed_fixtures_are_reproduced() {
    let db = seeded().await;

    let members = db.members().list().await.unwrap();
    assert_eq!(members.len(), SEED_MEMBERS.len());
    for (member, (id, name, phone, email)) in members.iter().zip(SEED_MEMBERS) {
        assert_eq!(member.id, id);
        assert_eq!(member.name, name);
        assert_eq!(member.phone, phone);
        assert_eq!(member.email.as_deref(), Some(email));
    }

    let books = db.books().list().await.unwrap();
    for (book, (id, title, price, stock)) in books.iter().zip(SEED_BOOKS) {
        assert_eq!(book.id, id);
        assert_eq!(book.title, title);
        assert_eq!(book.price, price);
        assert_eq!(book.stock, stock);
    }

    let ledger = db.sales().list_ledger().await.unwrap();
    assert_eq!(ledger.len(), SEED_SALES.len());
    for (row, (date, _, _, qty, discount, total)) in ledger.iter().zip(SEED_SALES) {
        assert_eq!(row.date, date);
        assert_eq!(row.quantity, qty);
        assert_eq!(row.discount, discount);
        assert_eq!(row.total, total);
    }
}

#[tokio::test]
async fn bootstrap_is_idempotent_across_reopen() {
    let path = std::env::temp_dir().join(format!(
        "bookstore-ledger-bootstrap-{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    let db = Database::new(DbConfig::new(&path)).await.unwrap();
    assert_eq!(db.bootstrap().await.unwrap(), BootstrapOutcome::AlreadyPresent);
    db.close().await;

    let db = Database::new(DbConfig::new(&path)).await.unwrap();
    assert_eq!(db.members().count().await.unwrap(), 3);
    assert_eq!(db.books().count().await.unwrap(), 3);
    assert_eq!(db.sales().count().await.unwrap(), 4);
    db.close().await;

    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.clone().into_os_string();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

#[tokio::test]
async fn create_sale_records_total_and_draws_down_stock() {
    let db = seeded().await;

    let request = NewSale::new("2024-02-01", "M001", "B001", 5, 50).unwrap();
    let sale = db.sales().create_sale(&request).await.unwrap();

    assert_eq!(sale.total, 600 * 5 - 50);
    assert_eq!(stock_of(&db, "B001").await, 45);

    let ledger = db.sales().list_ledger().await.unwrap();
    let last = ledger.last().unwrap();
    assert_eq!(last.id, sale.id);
    assert_eq!(last.member_name, "Alice");
    assert_eq!(last.book_title, "Python Programming");
}

#[tokio::test]
async fn oversized_quantity_is_refused_without_writing() {
    let db = seeded().await;

    let request = NewSale::new("2024-02-01", "M002", "B002", 999, 0).unwrap();
    let err = db.sales().create_sale(&request).await.unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::InsufficientStock));
    assert_eq!(stock_of(&db, "B002").await, 30);
    assert_eq!(db.sales().count().await.unwrap(), 4);
}

#[tokio::test]
async fn unknown_book_is_refused_without_writing() {
    let db = seeded().await;

    let request = NewSale::new("2024-02-01", "M001", "B999", 1, 0).unwrap();
    let err = db.sales().create_sale(&request).await.unwrap_err();

    match err {
        LedgerError::Rejected(CoreError::InvalidReference { entity, id }) => {
            assert_eq!(entity, "book");
            assert_eq!(id, "B999");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(db.sales().count().await.unwrap(), 4);
}

#[tokio::test]
async fn update_uses_current_book_price() {
    let db = seeded().await;

    // Sale #1 was written at 600 × 2 − 100 = 1100.
    sqlx::query("UPDATE book SET bprice = 700 WHERE bid = 'B001'")
        .execute(db.pool())
        .await
        .unwrap();

    let updated = db.sales().update_discount(1, 100).await.unwrap();
    assert_eq!(updated.total, 700 * 2 - 100);
    assert_eq!(stock_of(&db, "B001").await, 50);

    // Sale #4 was not touched and keeps its frozen total.
    let untouched = db.sales().get_by_id(4).await.unwrap().unwrap();
    assert_eq!(untouched.total, 600);
}

#[tokio::test]
async fn discount_larger_than_line_amount_gives_negative_total() {
    let db = seeded().await;

    let updated = db.sales().update_discount(4, 1000).await.unwrap();
    assert_eq!(updated.total, -400);
}

#[tokio::test]
async fn delete_reduces_count_and_leaves_stock() {
    let db = seeded().await;

    db.sales().delete_sale(3).await.unwrap();

    assert_eq!(db.sales().count().await.unwrap(), 3);
    assert_eq!(stock_of(&db, "B003").await, 20);

    let ids: Vec<i64> = db
        .sales()
        .list_ledger()
        .await
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, [1, 2, 4]);
}

#[tokio::test]
async fn sale_ids_are_not_reused_after_delete() {
    let db = seeded().await;

    db.sales().delete_sale(4).await.unwrap();
    let request = NewSale::new("2024-02-01", "M003", "B001", 1, 0).unwrap();
    let sale = db.sales().create_sale(&request).await.unwrap();

    assert_eq!(sale.id, 5);
}

#[tokio::test]
async fn report_after_deleting_everything_is_empty() {
    let db = seeded().await;

    for id in 1..=4 {
        db.sales().delete_sale(id).await.unwrap();
    }

    let rows = db.sales().list_ledger().await.unwrap();
    assert_eq!(generate_report(&rows), Report::Empty);
}

#[tokio::test]
async fn report_shows_every_seed_sale() {
    let db = seeded().await;

    let text = generate_report(&db.sales().list_ledger().await.unwrap()).to_string();

    for id in 1..=4 {
        assert!(text.contains(&format!("Sale #{id}\n")));
    }
    assert!(text.contains("Member: Cathy  Book: Python Programming"));
    assert!(text.contains("Sale total: 3,400"));
}
