//! # Ledger Report Rendering
//!
//! Turns ledger rows into the text blocks printed by the shell.
//!
//! ## Entry Layout
//! ```text
//! Sale #1
//! Date: 2024-01-15  Member: Alice  Book: Python Programming
//! --------------------------------------------------
//!   Unit Price         Qty    Discount    Subtotal
//! --------------------------------------------------
//!          600           2         100       1,100
//! --------------------------------------------------
//! Sale total: 1,100
//! ==================================================
//! ```
//!
//! The subtotal column is recomputed from the row's current price; the
//! "Sale total" line is the stored value. They differ only when a book's
//! price changed after the sale was written.

use std::fmt::{self, Write};

use crate::types::LedgerRow;

/// Width of the ruled lines.
pub const REPORT_WIDTH: usize = 50;

/// Width of each numeric column.
const COLUMN_WIDTH: usize = 12;

/// Printed when there are no sales.
pub const EMPTY_LEDGER_NOTICE: &str = "No sales records yet.";

/// Rendered output of the report operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// The sale table is empty. Not an error.
    Empty,
    /// The full formatted ledger.
    Ledger(String),
}

impl Report {
    pub fn is_empty(&self) -> bool {
        matches!(self, Report::Empty)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Empty => writeln!(f, "{EMPTY_LEDGER_NOTICE}"),
            Report::Ledger(text) => f.write_str(text),
        }
    }
}

/// Renders every row, in the order given, under a report banner.
pub fn generate_report(rows: &[LedgerRow]) -> Report {
    if rows.is_empty() {
        return Report::Empty;
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", banner("Sales Report"));
    for row in rows {
        out.push_str(&render_entry(row));
    }
    Report::Ledger(out)
}

/// Renders the block for a single sale.
pub fn render_entry(row: &LedgerRow) -> String {
    let thin = "-".repeat(REPORT_WIDTH);
    let thick = "=".repeat(REPORT_WIDTH);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Sale #{}", row.id);
    let _ = writeln!(
        out,
        "Date: {}  Member: {}  Book: {}",
        row.date, row.member_name, row.book_title
    );
    let _ = writeln!(out, "{thin}");
    let _ = writeln!(
        out,
        "{:>w$}{:>w$}{:>w$}{:>w$}",
        "Unit Price",
        "Qty",
        "Discount",
        "Subtotal",
        w = COLUMN_WIDTH
    );
    let _ = writeln!(out, "{thin}");
    let _ = writeln!(
        out,
        "{:>w$}{:>w$}{:>w$}{:>w$}",
        crate::Money::from_minor(row.price),
        row.quantity,
        crate::Money::from_minor(row.discount),
        row.subtotal(),
        w = COLUMN_WIDTH
    );
    let _ = writeln!(out, "{thin}");
    let _ = writeln!(out, "Sale total: {}", row.total());
    let _ = writeln!(out, "{thick}");
    out
}

/// Renders the numbered list the operator picks from when updating or
/// deleting. Position `n` in this list is the `n`-th row.
pub fn render_selection_menu(rows: &[LedgerRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", banner_sized("Sales Records", 8));
    for (position, row) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. Sale #{} - Member: {} - Date: {}",
            position + 1,
            row.id,
            row.member_name,
            row.date
        );
    }
    let _ = writeln!(out, "{}", "=".repeat(32));
    out
}

fn banner(title: &str) -> String {
    banner_sized(title, 20)
}

fn banner_sized(title: &str, side: usize) -> String {
    let rule = "=".repeat(side);
    format!("{rule} {title} {rule}")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, price: i64, total: i64) -> LedgerRow {
        LedgerRow {
            id,
            date: "2024-01-15".to_string(),
            member_name: "Alice".to_string(),
            book_title: "Python Programming".to_string(),
            price,
            quantity: 2,
            discount: 100,
            total,
        }
    }

    #[test]
    fn test_empty_report() {
        let report = generate_report(&[]);
        assert!(report.is_empty());
        assert_eq!(report.to_string(), "No sales records yet.\n");
    }

    #[test]
    fn test_entry_layout() {
        let text = render_entry(&row(1, 600, 1100));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Sale #1");
        assert_eq!(lines[1], "Date: 2024-01-15  Member: Alice  Book: Python Programming");
        assert_eq!(lines[3], "  Unit Price         Qty    Discount    Subtotal");
        assert_eq!(lines[5], "         600           2         100       1,100");
        assert_eq!(lines[7], "Sale total: 1,100");
        assert_eq!(lines[8], "=".repeat(REPORT_WIDTH));
    }

    #[test]
    fn test_subtotal_recomputed_independently_of_total() {
        // price raised to 700 after the sale was stored at 1,100
        let text = render_entry(&row(1, 700, 1100));
        assert!(text.contains("       1,300\n"));
        assert!(text.contains("Sale total: 1,100"));
    }

    #[test]
    fn test_report_keeps_row_order() {
        let report = generate_report(&[row(1, 600, 1100), row(3, 600, 1100)]);
        let text = report.to_string();

        assert!(text.starts_with("==================== Sales Report ===================="));
        let first = text.find("Sale #1").unwrap();
        let third = text.find("Sale #3").unwrap();
        assert!(first < third);
    }

    #[test]
    fn test_selection_menu_is_one_indexed() {
        let text = render_selection_menu(&[row(4, 600, 1100), row(9, 600, 1100)]);
        assert!(text.contains("1. Sale #4 - Member: Alice - Date: 2024-01-15"));
        assert!(text.contains("2. Sale #9 - Member: Alice - Date: 2024-01-15"));
    }
}
