//! # Bookstore Ledger Shell
//!
//! Wires configuration, logging and the database into the menu shell.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Application Startup                                │
//! │                                                                         │
//! │  main()                                                                 │
//! │    │                                                                    │
//! │    ├── 1. BookstoreConfig::load()      (defaults → TOML → env)         │
//! │    │                                                                    │
//! │    ├── 2. init_tracing()               (stderr, EnvFilter)             │
//! │    │                                                                    │
//! │    ├── 3. Database::new()              (pool + bootstrap + health)     │
//! │    │                                                                    │
//! │    ├── 4. Shell::run()                 (menu loop until 5/Enter/EOF)   │
//! │    │                                                                    │
//! │    └── 5. Database::close()                                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod shell;

use tokio::io::BufReader;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use bookstore_db::Database;

pub use config::{BookstoreConfig, ConfigError};
pub use error::{CliError, ErrorCode};
pub use shell::Shell;

/// Runs the interactive ledger against stdin/stdout.
pub async fn run() -> Result<(), CliError> {
    let config = BookstoreConfig::load(None)?;
    init_tracing(&config.logging.filter);

    match &config.source {
        Some(path) => info!(path = %path.display(), "Loaded ledger config from file"),
        None => debug!("No config file, using defaults and environment"),
    }
    info!(
        db = %config.database.path.display(),
        restore_stock_on_delete = config.ledger.restore_stock_on_delete,
        "Starting bookstore ledger"
    );

    let db = Database::new(config.db_config()).await?;
    if !db.health_check().await {
        db.close().await;
        return Err(CliError::new(
            ErrorCode::DatabaseError,
            "Database is not answering queries",
        ));
    }

    let input = BufReader::new(tokio::io::stdin());
    let result = Shell::new(db.clone(), input, std::io::stdout()).run().await;

    db.close().await;
    result
}

/// Initializes the tracing subscriber.
///
/// Output goes to stderr so it never interleaves with the menu on stdout.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=bookstore_db=trace` - Trace the database crate only
/// - Default: `[logging] filter` from config (`warn`)
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
