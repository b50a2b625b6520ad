//! # Profile Repository
//!
//! SQLite-backed [`Session`]: the user's onboarding profile, one row per field.
//!
//! ```text
//! profile
//! ┌─────────────┬─────────────────────────┐
//! │ key         │ value (JSON)            │
//! ├─────────────┼─────────────────────────┤
//! │ firstName   │ "Tilly"                 │
//! │ email       │ "tilly@example.com"     │
//! │ newsletter  │ true                    │
//! └─────────────┴─────────────────────────┘
//!
//! empty table  ⇔  not onboarded
//! ```
//!
//! Logging out clears this table only; the menu cache is kept.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use lemon_core::session::{Profile, Session};
use lemon_core::validation::validate_profile;

/// Repository for the persisted profile.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: SqlitePool,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProfileRepository { pool }
    }

    /// Replaces every stored field with `profile` in one transaction.
    async fn replace(&self, profile: &Profile) -> DbResult<()> {
        let result: DbResult<()> = async {
            let mut tx = self.pool.begin().await?;

            sqlx::query("DELETE FROM profile").execute(&mut *tx).await?;

            for (key, value) in profile {
                let encoded = serde_json::to_string(value)
                    .map_err(|e| DbError::Corrupt(format!("profile field {key}: {e}")))?;

                sqlx::query("INSERT INTO profile (key, value) VALUES (?1, ?2)")
                    .bind(key)
                    .bind(encoded)
                    .execute(&mut *tx)
                    .await?;
            }

            tx.commit().await?;
            Ok(())
        }
        .await;

        result.map_err(DbError::write_failed)
    }
}

#[async_trait]
impl Session for ProfileRepository {
    type Error = DbError;

    async fn load(&self) -> DbResult<Option<Profile>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT key, value FROM profile ORDER BY key")
                .fetch_all(&self.pool)
                .await?;

        if rows.is_empty() {
            return Ok(None);
        }

        let mut profile = Profile::new();
        for (key, raw) in rows {
            let value = serde_json::from_str(&raw)
                .map_err(|e| DbError::Corrupt(format!("profile field {key}: {e}")))?;
            profile.insert(key, value);
        }

        debug!(fields = profile.len(), "Profile loaded");
        Ok(Some(profile))
    }

    async fn onboard(&self, profile: &Profile) -> DbResult<()> {
        validate_profile(profile)?;
        self.replace(profile).await?;
        info!(fields = profile.len(), "User onboarded");
        Ok(())
    }

    async fn update(&self, profile: &Profile) -> DbResult<()> {
        self.replace(profile).await?;
        debug!(fields = profile.len(), "Profile updated");
        Ok(())
    }

    async fn logout(&self) -> DbResult<()> {
        sqlx::query("DELETE FROM profile")
            .execute(&self.pool)
            .await
            .map_err(DbError::write_failed)?;

        info!("User logged out");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
