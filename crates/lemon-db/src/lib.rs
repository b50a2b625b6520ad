//! # lemon-db: Local Store for the Lemon Menu Cache
//!
//! SQLite persistence for the cached menu and the user profile, using sqlx
//! for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Menu Cache Data Flow                             │
//! │                                                                         │
//! │  lemon-sync (SyncOrchestrator, CatalogService)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     lemon-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ MenuRepo      │    │ 001_menu     │  │   │
//! │  │   │ SqlitePool    │◄───│ ProfileRepo   │    │ 002_profile  │  │   │
//! │  │   │ ensure_schema │    │ QueryFilter-  │    │              │  │   │
//! │  │   │               │    │   Engine      │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (menu.db)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and schema lifecycle
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Menu and profile repositories
//! - [`query`] - Filter state → store query
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lemon_db::{Database, DbConfig};
//! use lemon_core::FilterState;
//!
//! let db = Database::new(DbConfig::new("path/to/menu.db")).await?;
//!
//! if db.menu().is_empty().await? {
//!     db.menu().insert_all(&items).await?;
//! }
//!
//! let visible = db.query_engine().apply(&FilterState::default()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod query;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use query::QueryFilterEngine;

// Repository re-exports for convenience
pub use repository::menu::MenuRepository;
pub use repository::profile::ProfileRepository;
