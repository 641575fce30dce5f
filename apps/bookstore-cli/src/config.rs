//! # Ledger Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BOOKSTORE_DB_PATH=/srv/shop/bookstore.db                           │
//! │     BOOKSTORE_RESTORE_STOCK_ON_DELETE=true                             │
//! │     BOOKSTORE_LOG=debug                                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $BOOKSTORE_CONFIG (must exist), or                                 │
//! │     ~/.config/ledger/bookstore.toml (Linux, skipped if absent)         │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     ./bookstore.db, no stock restore, warn-level logging               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "bookstore.db"
//!
//! [ledger]
//! restore_stock_on_delete = false
//!
//! [logging]
//! filter = "warn"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use bookstore_core::StockPolicy;
use bookstore_db::DbConfig;

/// Env var naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "BOOKSTORE_CONFIG";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Sections
// =============================================================================

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file, relative to the working directory unless absolute.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("bookstore.db")
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
        }
    }
}

/// `[ledger]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// Give a deleted sale's quantity back to its book.
    #[serde(default)]
    pub restore_stock_on_delete: bool,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "warn".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_filter(),
        }
    }
}

// =============================================================================
// Bookstore Config
// =============================================================================

/// Complete shell configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookstoreConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub ledger: LedgerSettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    /// File the settings were read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl BookstoreConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (bookstore.toml)
    /// 3. Environment variables
    ///
    /// A path passed in or named by `$BOOKSTORE_CONFIG` must exist. The
    /// platform default is only read when present.
    ///
    /// Runs before the tracing subscriber is installed, so nothing here is
    /// logged; [`source`](Self::source) records which file was read.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    fn load_with(
        config_path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let explicit = config_path.or_else(|| lookup(CONFIG_PATH_ENV).map(PathBuf::from));

        let source = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigError::Invalid(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            Some(path) => Some(path),
            None => Self::default_config_path().filter(|path| path.exists()),
        };

        let mut config: Self = match &source {
            Some(path) => toml::from_str(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        config.source = source;

        config.apply_overrides(lookup)?;
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path must not be empty".into()));
        }

        EnvFilter::try_new(&self.logging.filter).map_err(|e| {
            ConfigError::Invalid(format!(
                "logging.filter '{}' is not a valid filter: {e}",
                self.logging.filter
            ))
        })?;

        Ok(())
    }

    /// Applies overrides from a key lookup (the process environment in
    /// [`load`](Self::load)).
    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(path) = lookup("BOOKSTORE_DB_PATH") {
            self.database.path = PathBuf::from(path);
        }

        if let Some(flag) = lookup("BOOKSTORE_RESTORE_STOCK_ON_DELETE") {
            self.ledger.restore_stock_on_delete = parse_flag(&flag).ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "BOOKSTORE_RESTORE_STOCK_ON_DELETE '{flag}' is not a boolean"
                ))
            })?;
        }

        if let Some(filter) = lookup("BOOKSTORE_LOG") {
            self.logging.filter = filter;
        }

        Ok(())
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "bookstore", "ledger")
            .map(|dirs| dirs.config_dir().join("bookstore.toml"))
    }

    /// Stock policy for the sales engine.
    pub fn stock_policy(&self) -> StockPolicy {
        StockPolicy {
            restore_on_delete: self.ledger.restore_stock_on_delete,
        }
    }

    /// Database settings for [`bookstore_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path).stock_policy(self.stock_policy())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
