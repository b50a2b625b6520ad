//! # Sync Error Types
//!
//! Error types for fetching and synchronizing the catalog.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sync Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Fetch         │  │     Storage             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Network        │  │  DbError::SchemaInit    │ │
//! │  │  InvalidUrl     │  │  Format         │  │  DbError::WriteFailed   │ │
//! │  │  ConfigLoad/Save│  │                 │  │  ...                    │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │   Input         │  │   Internal      │                              │
//! │  │                 │  │                 │                              │
//! │  │  InvalidQuery   │  │  ShuttingDown   │                              │
//! │  │                 │  │                 │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use lemon_core::ValidationError;
use lemon_db::DbError;
use thiserror::Error;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

// =============================================================================
// Fetch Errors
// =============================================================================

/// Failure to obtain a usable catalog from the remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport failure or non-success HTTP status.
    #[error("Network error: {0}")]
    Network(String),

    /// The response arrived but does not match the catalog schema.
    #[error("Malformed catalog: {0}")]
    Format(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Format(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Format(err.to_string())
    }
}

// =============================================================================
// Sync Errors
// =============================================================================

/// Sync error type covering every failure surfaced by this crate.
#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value.
    #[error("Invalid catalog configuration: {0}")]
    InvalidConfig(String),

    /// Catalog or image URL is not usable.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Fetch / Storage Errors
    // =========================================================================
    /// The remote catalog could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The local store rejected an operation.
    #[error("Storage error: {0}")]
    Storage(#[from] DbError),

    // =========================================================================
    // Input Errors
    // =========================================================================
    /// Search text failed validation.
    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] ValidationError),

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// A background task has stopped.
    #[error("Search debouncer is shut down")]
    ShuttingDown,
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<url::ParseError> for SyncError {
    fn from(err: url::ParseError) -> Self {
        SyncError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SyncError {
    fn from(err: toml::ser::Error) -> Self {
        SyncError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl SyncError {
    /// Returns true if running the same operation again may succeed.
    ///
    /// ## Retryable Errors
    /// - Network failures
    /// - Transient storage contention
    ///
    /// ## Non-Retryable Errors
    /// - Configuration errors
    /// - A malformed remote catalog (it will be malformed again)
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SyncError::Fetch(FetchError::Network(_))
                | SyncError::Storage(DbError::PoolExhausted)
                | SyncError::Storage(DbError::ConnectionFailed(_))
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SyncError::InvalidConfig(_)
                | SyncError::InvalidUrl(_)
                | SyncError::ConfigLoadFailed(_)
                | SyncError::ConfigSaveFailed(_)
        )
    }
}
