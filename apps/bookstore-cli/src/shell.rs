//! # Menu Shell
//!
//! The interactive loop: reads one line at a time, drives the sales engine,
//! prints results and notices.
//!
//! ## Menu
//! ```text
//! ========== Bookstore Sales Ledger ==========
//! 1. Create sale
//! 2. Sales report
//! 3. Update sale
//! 4. Delete sale
//! 5. Exit
//! ============================================
//! ```
//!
//! ## Create Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  date ──► member id ──► book id ──► quantity ──► discount ──► commit   │
//! │   │          │             │           │            │                   │
//! │   │          └── unknown? ─┴── re-ask that field ───┘                   │
//! │   │                                    │                                │
//! │   │                          more than stock? re-ask quantity           │
//! │   └── Enter cancels                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Update and delete list the ledger, take a 1-indexed position, and go
//! back to the menu on an invalid or empty choice.
//!
//! End of input ends whatever is in progress and then the loop.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use bookstore_core::report::{generate_report, render_selection_menu, EMPTY_LEDGER_NOTICE};
use bookstore_core::validation::{
    check_stock, parse_discount, parse_quantity, select_position, validate_entity_id,
};
use bookstore_core::{Book, CoreError, LedgerRow, Money, NewSale, SaleDate, DATE_FORMAT_HINT};
use bookstore_db::Database;

use crate::error::CliError;

const MENU: &str = "\
========== Bookstore Sales Ledger ==========
1. Create sale
2. Sales report
3. Update sale
4. Delete sale
5. Exit
============================================";

/// Result of a single prompt.
enum Answer {
    /// A line of text, line ending stripped.
    Line(String),
    /// Empty line: the operator backed out. Whitespace is still a line.
    Blank,
    /// Input closed.
    Eof,
}

/// Interactive ledger shell over any line source and sink.
///
/// ## Usage
/// ```rust,ignore
/// let input = tokio::io::BufReader::new(tokio::io::stdin());
/// Shell::new(db, input, std::io::stdout()).run().await?;
/// ```
pub struct Shell<R, W> {
    db: Database,
    input: R,
    output: W,
}

impl<R, W> Shell<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(db: Database, input: R, output: W) -> Self {
        Shell { db, input, output }
    }

    /// Runs the menu until the operator exits or input ends.
    ///
    /// Only I/O failures end the loop early; every other error is printed
    /// and the menu is shown again.
    pub async fn run(&mut self) -> Result<(), CliError> {
        loop {
            writeln!(self.output, "{MENU}")?;

            let choice = match self.prompt("Select an option (1-5, Enter to exit): ").await? {
                Answer::Line(line) => line,
                Answer::Blank | Answer::Eof => break,
            };

            let outcome = match choice.trim() {
                "1" => self.create_sale().await,
                "2" => self.show_report().await,
                "3" => self.update_sale().await,
                "4" => self.delete_sale().await,
                "5" => break,
                other => {
                    debug!(choice = %other, "Unknown menu choice");
                    self.say("Please enter a valid option (1-5).")
                }
            };

            if let Err(err) = outcome {
                if err.is_fatal() {
                    return Err(err);
                }
                self.reject(err)?;
            }
        }

        self.say("Goodbye!")
    }

    // =========================================================================
    // Operations
    // =========================================================================

    async fn create_sale(&mut self) -> Result<(), CliError> {
        let today = SaleDate::today();
        let date_prompt = format!("Sale date ({DATE_FORMAT_HINT}, e.g. {today}; Enter to cancel): ");

        let date = loop {
            match self.prompt(&date_prompt).await? {
                Answer::Line(line) => match SaleDate::parse(&line) {
                    Ok(date) => break date,
                    Err(err) => self.reject(err)?,
                },
                Answer::Blank => return self.say("Create cancelled."),
                Answer::Eof => return Ok(()),
            }
        };

        let member_id = loop {
            let Some(line) = self.prompt_field("Member id: ").await? else {
                return Ok(());
            };
            match self.lookup_member(&line).await? {
                Ok(id) => break id,
                Err(err) => self.reject(err)?,
            }
        };

        let book = loop {
            let Some(line) = self.prompt_field("Book id: ").await? else {
                return Ok(());
            };
            match self.lookup_book(&line).await? {
                Ok(book) => break book,
                Err(err) => self.reject(err)?,
            }
        };

        let quantity = loop {
            let Some(line) = self.prompt_field("Quantity: ").await? else {
                return Ok(());
            };
            let checked = parse_quantity(&line)
                .map_err(CoreError::from)
                .and_then(|qty| check_stock(&book, qty).map(|()| qty));
            match checked {
                Ok(qty) => break qty,
                Err(err) => self.reject(err)?,
            }
        };

        let discount = loop {
            let Some(line) = self.prompt_field("Discount: ").await? else {
                return Ok(());
            };
            match parse_discount(&line) {
                Ok(discount) => break discount,
                Err(err) => self.reject(CoreError::from(err))?,
            }
        };

        let request = NewSale::new(date.as_str(), &member_id, &book.id, quantity, discount)?;
        let sale = self.db.sales().create_sale(&request).await?;

        self.say(format!("=> Sale recorded (total: {})", sale.total()))
    }

    async fn show_report(&mut self) -> Result<(), CliError> {
        let rows = self.db.sales().list_ledger().await?;
        write!(self.output, "{}", generate_report(&rows))?;
        Ok(())
    }

    async fn update_sale(&mut self) -> Result<(), CliError> {
        let Some(row) = self.select_sale("update").await? else {
            return Ok(());
        };

        self.say(format!("Current discount: {}", Money::from_minor(row.discount)))?;

        let discount = loop {
            let Some(line) = self.prompt_field("New discount: ").await? else {
                return Ok(());
            };
            match parse_discount(&line) {
                Ok(discount) => break discount,
                Err(err) => self.reject(CoreError::from(err))?,
            }
        };

        let sale = self.db.sales().update_discount(row.id, discount).await?;
        self.say(format!("=> Sale #{} updated (total: {})", sale.id, sale.total()))
    }

    async fn delete_sale(&mut self) -> Result<(), CliError> {
        let Some(row) = self.select_sale("delete").await? else {
            return Ok(());
        };

        let sale = self.db.sales().delete_sale(row.id).await?;
        self.say(format!("=> Sale #{} deleted", sale.id))
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Lists the ledger and resolves the operator's 1-indexed pick.
    ///
    /// `None` when the ledger is empty, the operator cancelled, or the
    /// choice was invalid (the reason has already been printed).
    async fn select_sale(&mut self, action: &str) -> Result<Option<LedgerRow>, CliError> {
        let rows = self.db.sales().list_ledger().await?;
        if rows.is_empty() {
            self.say(EMPTY_LEDGER_NOTICE)?;
            return Ok(None);
        }

        write!(self.output, "{}", render_selection_menu(&rows))?;

        let prompt = format!("Select the sale to {action} (number, Enter to cancel): ");
        let choice = match self.prompt(&prompt).await? {
            Answer::Line(line) => line,
            Answer::Blank => {
                self.say(format!("{} cancelled.", capitalize(action)))?;
                return Ok(None);
            }
            Answer::Eof => return Ok(None),
        };

        match select_position(&choice, rows.len()) {
            Ok(index) => Ok(rows.into_iter().nth(index)),
            Err(err) => {
                self.reject(err)?;
                Ok(None)
            }
        }
    }

    /// Validates and looks up a member id; the inner error is for the
    /// operator, the outer one is storage.
    async fn lookup_member(&self, input: &str) -> Result<Result<String, CoreError>, CliError> {
        let id = match validate_entity_id("member id", input) {
            Ok(id) => id,
            Err(err) => return Ok(Err(err.into())),
        };

        Ok(match self.db.members().get_by_id(&id).await? {
            Some(member) => Ok(member.id),
            None => Err(CoreError::unknown("member", id)),
        })
    }

    async fn lookup_book(&self, input: &str) -> Result<Result<Book, CoreError>, CliError> {
        let id = match validate_entity_id("book id", input) {
            Ok(id) => id,
            Err(err) => return Ok(Err(err.into())),
        };

        Ok(self
            .db
            .books()
            .get_by_id(&id)
            .await?
            .ok_or_else(|| CoreError::unknown("book", id)))
    }

    async fn prompt(&mut self, text: &str) -> Result<Answer, CliError> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            // Keep the transcript tidy when input ends mid-prompt.
            writeln!(self.output)?;
            return Ok(Answer::Eof);
        }

        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Ok(Answer::Blank);
        }
        Ok(Answer::Line(line.to_string()))
    }

    /// Prompt for a required field; a blank line comes back as `""` so the
    /// validator reports it. `None` on end of input.
    async fn prompt_field(&mut self, text: &str) -> Result<Option<String>, CliError> {
        Ok(match self.prompt(text).await? {
            Answer::Line(line) => Some(line),
            Answer::Blank => Some(String::new()),
            Answer::Eof => None,
        })
    }

    fn say(&mut self, message: impl std::fmt::Display) -> Result<(), CliError> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    fn reject(&mut self, err: impl Into<CliError>) -> Result<(), CliError> {
        let err = err.into();
        debug!(code = ?err.code, message = %err.message, "Input rejected");
        self.say(format!("Error: {}", err.message))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bookstore_core::StockPolicy;
    use bookstore_db::DbConfig;

    async fn seeded() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Feeds `script` to a shell and returns everything it printed.
    async fn drive(db: &Database, script: &str) -> String {
        let mut out = Vec::new();
        Shell::new(db.clone(), script.as_bytes(), &mut out)
            .run()
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    async fn stock_of(db: &Database, id: &str) -> i64 {
        db.books().get_by_id(id).await.unwrap().unwrap().stock
    }

    #[tokio::test]
    async fn test_exit_choices() {
        let db = seeded().await;

        for script in ["5\n", "\n", ""] {
            let out = drive(&db, script).await;
            assert!(out.contains("1. Create sale"));
            assert!(out.ends_with("Goodbye!\n"));
        }
    }

    #[tokio::test]
    async fn test_unknown_option_reprompts() {
        let db = seeded().await;

        let out = drive(&db, "9\nabc\n5\n").await;
        assert_eq!(out.matches("Please enter a valid option (1-5).").count(), 2);
        assert_eq!(out.matches("5. Exit").count(), 3);
    }

    #[tokio::test]
    async fn test_whitespace_choice_is_not_exit() {
        let db = seeded().await;

        let out = drive(&db, "   \n2\n5\n").await;
        assert_eq!(out.matches("Please enter a valid option (1-5).").count(), 1);
        assert!(out.contains("Sales Report"));
        assert_eq!(out.matches("5. Exit").count(), 3);
    }

    #[tokio::test]
    async fn test_whitespace_selection_is_rejected_not_cancelled() {
        let db = seeded().await;

        let out = drive(&db, "3\n  \n5\n").await;
        assert!(out.contains("Error: selection has invalid format"));
        assert!(!out.contains("Update cancelled."));
    }

    #[tokio::test]
    async fn test_report() {
        let db = seeded().await;

        let out = drive(&db, "2\n").await;
        assert!(out.contains("==================== Sales Report ===================="));
        assert!(out.contains("Sale #4\n"));
        assert!(out.contains("Sale total: 3,400"));
    }

    #[tokio::test]
    async fn test_create_sale() {
        let db = seeded().await;

        let out = drive(&db, "1\n2024-02-01\nM001\nB001\n5\n50\n5\n").await;

        assert!(out.contains("=> Sale recorded (total: 2,950)"));
        assert_eq!(stock_of(&db, "B001").await, 45);
        assert_eq!(db.sales().count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_create_sale_reprompts_each_bad_field() {
        let db = seeded().await;

        let script = "1\n\
                      2024/02/01\n2024-02-01\n\
                      M999\nM002\n\
                      \nB002\n\
                      999\n0\n3\n\
                      -1\n100\n";
        let out = drive(&db, script).await;

        assert!(out.contains("Error: date has invalid format: expected '-' at position 5"));
        assert!(out.contains("Error: Unknown member id: M999"));
        assert!(out.contains("Error: book id is required"));
        assert!(out.contains("Error: Insufficient stock for B002: available 30, requested 999"));
        assert!(out.contains("Error: quantity must be a positive integer"));
        assert!(out.contains("=> Sale recorded (total: 2,300)"));
        assert_eq!(stock_of(&db, "B002").await, 27);
    }

    #[tokio::test]
    async fn test_create_cancelled_at_date() {
        let db = seeded().await;

        let out = drive(&db, "1\n\n5\n").await;
        assert!(out.contains("Create cancelled."));
        assert_eq!(db.sales().count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_input_ending_mid_create_writes_nothing() {
        let db = seeded().await;

        let out = drive(&db, "1\n2024-02-01\nM001\nB001\n5\n").await;
        assert!(!out.contains("Sale recorded"));
        assert_eq!(db.sales().count().await.unwrap(), 4);
        assert_eq!(stock_of(&db, "B001").await, 50);
    }

    #[tokio::test]
    async fn test_update_sale() {
        let db = seeded().await;

        let out = drive(&db, "3\n1\n-5\n0\n").await;

        assert!(out.contains("1. Sale #1 - Member: Alice - Date: 2024-01-15"));
        assert!(out.contains("Current discount: 100"));
        assert!(out.contains("Error: discount must be a non-negative integer"));
        assert!(out.contains("=> Sale #1 updated (total: 1,200)"));
        assert_eq!(stock_of(&db, "B001").await, 50);
    }

    #[tokio::test]
    async fn test_update_out_of_range_returns_to_menu() {
        let db = seeded().await;

        let out = drive(&db, "3\n9\n5\n").await;
        assert!(out.contains("Error: Selection 9 is out of range (1-4)"));
        assert!(!out.contains("Current discount"));
    }

    #[tokio::test]
    async fn test_update_cancelled() {
        let db = seeded().await;

        let out = drive(&db, "3\n\n5\n").await;
        assert!(out.contains("Update cancelled."));
    }

    #[tokio::test]
    async fn test_delete_by_position() {
        let db = seeded().await;

        // Each pick resolves against a fresh listing.
        let out = drive(&db, "4\n1\n4\n1\n").await;
        assert!(out.contains("=> Sale #1 deleted"));
        assert!(out.contains("=> Sale #2 deleted"));
        assert_eq!(db.sales().count().await.unwrap(), 2);
        assert_eq!(stock_of(&db, "B002").await, 30);
    }

    #[tokio::test]
    async fn test_delete_restores_stock_when_configured() {
        let db = Database::new(DbConfig::in_memory().stock_policy(StockPolicy {
            restore_on_delete: true,
        }))
        .await
        .unwrap();

        drive(&db, "4\n2\n").await;
        assert_eq!(stock_of(&db, "B002").await, 31);
    }

    #[tokio::test]
    async fn test_empty_ledger_notices() {
        let db = seeded().await;
        for id in 1..=4 {
            db.sales().delete_sale(id).await.unwrap();
        }

        let out = drive(&db, "2\n3\n4\n").await;
        assert_eq!(out.matches(EMPTY_LEDGER_NOTICE).count(), 3);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("update"), "Update");
        assert_eq!(capitalize(""), "");
    }
}
