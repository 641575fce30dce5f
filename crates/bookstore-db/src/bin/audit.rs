//! # Ledger Audit
//!
//! Lists sales whose stored total no longer matches the book's current
//! price. Nothing is modified.
//!
//! ## Usage
//! ```bash
//! # Audit ./bookstore.db (default)
//! cargo run -p bookstore-db --bin audit
//!
//! # Specify database path
//! cargo run -p bookstore-db --bin audit -- --db ./data/bookstore.db
//!
//! # Machine-readable output
//! cargo run -p bookstore-db --bin audit -- --json
//! ```
//!
//! Exits 0 once the audit has run, whether or not totals drifted. Bad
//! arguments, a missing file or a non-ledger database exit 2.

use std::env;
use std::path::Path;

use bookstore_core::TotalDiscrepancy;
use bookstore_db::{schema, Database, DbConfig};
use serde::Serialize;

/// JSON document printed with `--json`.
#[derive(Debug, Serialize)]
struct AuditReport {
    database: String,
    sales_checked: i64,
    discrepancies: Vec<TotalDiscrepancy>,
}

const USAGE: &str = "\
Bookstore Ledger Audit

Usage: audit [OPTIONS]

Options:
  -d, --db <PATH>    Database file path (default: ./bookstore.db)
  -j, --json         Print the result as JSON
  -h, --help         Show this help message";

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Audit { db_path: String, json: bool },
    Help,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Command, String> {
    let mut db_path = String::from("./bookstore.db");
    let mut json = false;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" | "-d" => {
                db_path = args
                    .next()
                    .ok_or_else(|| format!("{arg} needs a database path"))?;
            }
            "--json" | "-j" => json = true,
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    Ok(Command::Audit { db_path, json })
}

/// Prints `message` and exits with the usage-error status.
fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(2);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (db_path, json) = match parse_args(env::args().skip(1)) {
        Ok(Command::Audit { db_path, json }) => (db_path, json),
        Ok(Command::Help) => {
            println!("{USAGE}");
            return Ok(());
        }
        Err(message) => {
            eprintln!("{USAGE}");
            eprintln!();
            fail(message)
        }
    };

    // Opening a missing path would create an empty file.
    if !Path::new(&db_path).exists() {
        fail(format!("no database at {db_path}"));
    }

    let db = Database::new(DbConfig::new(&db_path).bootstrap(false)).await?;

    let missing = schema::missing_tables(db.pool()).await?;
    if !missing.is_empty() {
        db.close().await;
        fail(format!(
            "{db_path} is not a ledger database (missing: {})",
            missing.join(", ")
        ));
    }

    let report = AuditReport {
        database: db_path,
        sales_checked: db.sales().count().await?,
        discrepancies: db.sales().audit_totals().await?,
    };
    db.close().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Bookstore Ledger Audit");
        println!("======================");
        println!("Database: {}", report.database);
        println!("Sales checked: {}", report.sales_checked);
        println!();

        if report.discrepancies.is_empty() {
            println!("✓ Every stored total matches the current book price");
        } else {
            println!("{:>8}{:>14}{:>14}", "Sale", "Stored", "Current");
            for d in &report.discrepancies {
                println!("{:>8}{:>14}{:>14}", d.sale_id, d.stored, d.recomputed);
            }
            println!();
            println!("⚠ {} sale(s) out of step", report.discrepancies.len());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        assert_eq!(
            parse_args(args(&[])),
            Ok(Command::Audit {
                db_path: "./bookstore.db".to_string(),
                json: false,
            })
        );
    }

    #[test]
    fn test_db_and_json() {
        assert_eq!(
            parse_args(args(&["-j", "--db", "shop.db"])),
            Ok(Command::Audit {
                db_path: "shop.db".to_string(),
                json: true,
            })
        );
        assert_eq!(parse_args(args(&["--db", "x.db", "--help"])), Ok(Command::Help));
    }

    #[test]
    fn test_db_without_value_is_an_error() {
        let err = parse_args(args(&["--db"])).unwrap_err();
        assert!(err.contains("needs a database path"));
    }

    #[test]
    fn test_unknown_argument_is_an_error() {
        let err = parse_args(args(&["--fix"])).unwrap_err();
        assert_eq!(err, "unknown argument: --fix");
    }
}
