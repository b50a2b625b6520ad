//! # Schema
//!
//! The store schema is embedded at compile time from `migrations/sqlite/`:
//!
//! | File                 | Creates                                   |
//! |----------------------|-------------------------------------------|
//! | `001_menu_items.sql` | `menu_items` plus the category index      |
//! | `002_profile.sql`    | `profile` key/value table                 |
//!
//! sqlx records what has been applied in `_sqlx_migrations`, so a warm start
//! runs nothing. Files are append-only: changing an applied one makes every
//! existing store fail its checksum and refuse to open.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies whatever part of the schema is missing.
///
/// Fails with [`DbError::SchemaInit`](crate::DbError::SchemaInit) and leaves
/// the store untouched if any step fails.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(embedded = MIGRATOR.iter().count(), "Ensuring schema");

    MIGRATOR.run(pool).await?;

    info!("Schema ready");
    Ok(())
}
