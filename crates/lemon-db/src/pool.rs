//! # Store Handle
//!
//! Opens the on-device menu store and hands out repositories.
//!
//! ```text
//!   DbConfig::new("menu.db")          DbConfig::in_memory()
//!            │                                 │
//!            └──────────────┬──────────────────┘
//!                           ▼
//!              Database::new(config).await
//!                 open file (create if missing)
//!                 journal_mode = WAL
//!                 ensure_schema()      (unless run_migrations(false))
//!                           │
//!        ┌──────────────────┼──────────────────────┐
//!        ▼                  ▼                      ▼
//!     menu()          query_engine()           profile()
//!   MenuRepository   QueryFilterEngine     ProfileRepository
//! ```
//!
//! WAL keeps readers off a half-written batch: a query running during
//! `insert_all` sees the store as it was before the batch or after it.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::query::QueryFilterEngine;
use crate::repository::menu::MenuRepository;
use crate::repository::profile::ProfileRepository;

const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/menu.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Where the store lives on disk, or `:memory:`.
    pub database_path: PathBuf,

    /// Pool ceiling. Default: 5
    pub max_connections: u32,

    /// Connections kept open while idle. Default: 1
    pub min_connections: u32,

    /// How long to wait for a free connection. Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle connections above the minimum close after this. Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to ensure the schema on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Store at `path`, created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Skip schema creation in `Database::new`; call `ensure_schema` later.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Throwaway store for tests. Lives as long as its single connection.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY),
            max_connections: 1, // each connection would get its own empty database
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new().filename(&self.database_path)
        };

        Ok(options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the menu store.
///
/// Cheap to clone; every clone shares the same pool. Passed explicitly to
/// whoever needs it, there is no global handle.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database and, unless disabled, ensures the schema.
    ///
    /// ## Errors
    /// * `DbError::ConnectionFailed` - The file could not be opened
    /// * `DbError::SchemaInit` - The schema could not be created
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening menu store"
        );

        let connect_options = config.connect_options()?;

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Menu store pool ready"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.ensure_schema().await?;
        }

        Ok(db)
    }

    /// Creates the schema if missing; a no-op when it already exists.
    ///
    /// Safe to call on every start, and more than once per process.
    pub async fn ensure_schema(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Cached menu items.
    pub fn menu(&self) -> MenuRepository {
        MenuRepository::new(self.pool.clone())
    }

    /// Maps a `FilterState` onto a store query.
    pub fn query_engine(&self) -> QueryFilterEngine {
        QueryFilterEngine::new(self.menu())
    }

    /// The persisted onboarding profile.
    pub fn profile(&self) -> ProfileRepository {
        ProfileRepository::new(self.pool.clone())
    }

    /// Waits for open connections to finish, then closes the pool.
    ///
    /// Repositories obtained earlier fail from here on.
    pub async fn close(&self) {
        info!("Closing menu store");
        self.pool.close().await;
    }

    /// `SELECT 1` round-trip.
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
    use crate::test_support::sample_menu;

    #[tokio::test]
    async fn test_in_memory_store_starts_empty() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
        assert!(db.menu().is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_config_overrides() {
        let config = DbConfig::new("cache/menu.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.menu().insert_all(&sample_menu()).await.unwrap();

        db.ensure_schema().await.unwrap();
        db.ensure_schema().await.unwrap();

        assert_eq!(db.menu().count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_schema_deferred_when_migrations_disabled() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        assert!(db.menu().count().await.is_err());

        db.ensure_schema().await.unwrap();
        assert_eq!(db.menu().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.menu().insert_all(&sample_menu()).await.unwrap();
        db.close().await;

        let reopened = Database::new(DbConfig::new(&path)).await.unwrap();
        let items = reopened.menu().scan_all().await.unwrap();

        assert_eq!(items, sample_menu());
    }
}
