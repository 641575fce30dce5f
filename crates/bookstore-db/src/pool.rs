//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  Shell startup                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Pool settings + StockPolicy                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + bootstrap schema          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐                                 │                           │
//! │  │  │Conn1│  acquired per operation,        │                           │
//! │  │  └─────┘  released when it goes out      │                           │
//! │  │           of scope (error paths too)     │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.sales().create_sale(..) ──► BEGIN … COMMIT on one connection       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The shell runs one menu operation at a time, so a single connection is
//! enough. The pool still owns acquisition and release.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use bookstore_core::StockPolicy;

use crate::error::{DbError, DbResult};
use crate::repository::book::BookRepository;
use crate::repository::member::MemberRepository;
use crate::repository::sale::SaleRepository;
use crate::schema::{self, BootstrapOutcome};

/// Path marker for a private in-memory database.
const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("./bookstore.db")
///     .stock_policy(StockPolicy { restore_on_delete: true });
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 1 (one menu operation at a time)
    pub max_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// `None` keeps connections open for the pool's lifetime.
    pub idle_timeout: Option<Duration>,

    /// Maximum age of a connection before it is replaced.
    /// `None` for in-memory databases.
    pub max_lifetime: Option<Duration>,

    /// Whether to create tables and seed rows on connect.
    /// Default: true
    pub bootstrap: bool,

    /// What deleting a sale does to book stock.
    pub stock_policy: StockPolicy,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            max_lifetime: Some(Duration::from_secs(30 * 60)),
            bootstrap: true,
            stock_policy: StockPolicy::default(),
        }
    }

    /// Sets whether to bootstrap the schema on connect.
    pub fn bootstrap(mut self, run: bool) -> Self {
        self.bootstrap = run;
        self
    }

    /// Sets the stock policy handed to the sale repository.
    pub fn stock_policy(mut self, policy: StockPolicy) -> Self {
        self.stock_policy = policy;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// The single connection is never recycled; dropping it would drop
    /// the database with it.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// // Seeded and isolated, one per test
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            max_lifetime: None,
            bootstrap: true,
            stock_policy: StockPolicy::default(),
        }
    }

    /// True for the `:memory:` path.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        if self.is_in_memory() {
            return SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()));
        }

        Ok(SqliteConnectOptions::new()
            .filename(&self.database_path)
            // WAL mode: readers don't block the writer
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL synchronous: may lose the last transaction on power loss,
            // never corrupts
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Storage handle passed into every ledger operation.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("bookstore.db")).await?;
///
/// let rows = db.sales().list_ledger().await?;
/// let alice = db.members().get_by_id("M001").await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,

    /// Policy passed to each `SaleRepository`.
    stock_policy: StockPolicy,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Creates the connection pool
    /// 3. Bootstraps tables and seed rows (if enabled)
    ///
    /// ## Returns
    /// * `Ok(Database)` - Ready-to-use database handle
    /// * `Err(DbError)` - Connection or bootstrap failed
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_options = config.connect_options()?;
        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database {
            pool,
            stock_policy: config.stock_policy,
        };

        if config.bootstrap {
            db.bootstrap().await?;
        }

        Ok(db)
    }

    /// Ensures the three tables exist, seeding them on first run.
    ///
    /// Safe to call any number of times.
    pub async fn bootstrap(&self) -> DbResult<BootstrapOutcome> {
        let outcome = schema::bootstrap(&self.pool).await?;
        info!(?outcome, "Schema bootstrap complete");
        Ok(outcome)
    }

    /// Returns a reference to the connection pool.
    ///
    /// For advanced queries not covered by repositories.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the member repository.
    pub fn members(&self) -> MemberRepository {
        MemberRepository::new(self.pool.clone())
    }

    /// Returns the book repository.
    pub fn books(&self) -> BookRepository {
        BookRepository::new(self.pool.clone())
    }

    /// Returns the sale repository (the sales engine).
    ///
    /// ## Example
    /// ```rust,ignore
    /// let sale = db.sales().create_sale(&request).await?;
    /// ```
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone(), self.stock_policy)
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, all repository operations will fail.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
        assert_eq!(db.sales().count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_bootstrap_disabled_leaves_database_empty() {
        let db = Database::new(DbConfig::in_memory().bootstrap(false))
            .await
            .unwrap();

        assert!(!schema::table_exists(db.pool(), "sale").await.unwrap());
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db").stock_policy(StockPolicy {
            restore_on_delete: true,
        });

        assert_eq!(config.max_connections, 1);
        assert!(config.stock_policy.restore_on_delete);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }
}
