//! # Store Errors
//!
//! ```text
//! sqlx::Error ──────────┐
//! MigrateError ─────────┤
//! ValidationError ──────┼──► DbError ──► SyncError::Storage (lemon-sync)
//!                       │
//!   inside a batch ─────┴──► DbError::WriteFailed   (batch rolled back)
//! ```

use lemon_core::ValidationError;
use thiserror::Error;

/// Local store errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// A row with this key is already stored.
    ///
    /// ## When This Occurs
    /// - Inserting a menu item whose id is already cached
    /// - Two items in one batch share an id
    #[error("Duplicate key {field} already stored")]
    UniqueViolation { field: String },

    /// A row broke a CHECK constraint (negative price, unknown category).
    #[error("Rejected by store constraint: {0}")]
    ConstraintViolation(String),

    /// The store file could not be opened.
    ///
    /// ## When This Occurs
    /// - Parent directory missing or read-only
    /// - Disk full
    /// - Pool already closed
    #[error("Could not open store: {0}")]
    ConnectionFailed(String),

    /// The schema could not be created or upgraded.
    #[error("Schema initialization failed: {0}")]
    SchemaInit(String),

    /// A batch write was rolled back. Nothing from the batch is stored.
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// A read failed, usually because the schema is missing.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Input rejected before reaching SQLite.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Every connection is busy and none freed up within the acquire timeout.
    #[error("Store busy: no free connection")]
    PoolExhausted,

    /// A stored value could not be decoded.
    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

impl DbError {
    /// Wraps any failure that happened inside a write transaction.
    pub(crate) fn write_failed(err: impl Into<DbError>) -> Self {
        match err.into() {
            DbError::WriteFailed(msg) => DbError::WriteFailed(msg),
            other => DbError::WriteFailed(other.to_string()),
        }
    }
}

/// ```text
/// Database("UNIQUE constraint failed: t.c") → UniqueViolation { field: "t.c" }
/// Database("CHECK constraint failed: ...")  → ConstraintViolation
/// Database(other)                           → QueryFailed
/// PoolTimedOut                              → PoolExhausted
/// PoolClosed / Io                           → ConnectionFailed
/// ColumnDecode / Decode                     → Corrupt
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        const UNIQUE: &str = "UNIQUE constraint failed: ";
        const CHECK: &str = "CHECK constraint failed";

        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                if let Some(field) = msg.strip_prefix(UNIQUE) {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                    }
                } else if msg.starts_with(CHECK) {
                    DbError::ConstraintViolation(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("store is closed".to_string()),
            sqlx::Error::Io(e) => DbError::ConnectionFailed(e.to_string()),
            e @ (sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_)) => {
                DbError::Corrupt(e.to_string())
            }
            other => DbError::QueryFailed(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::SchemaInit(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
