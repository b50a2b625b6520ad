//! # Sync Orchestrator
//!
//! Decides whether the local store gets filled from the remote catalog.
//!
//! ## Policy: Fill Once, Keep Forever
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ensure_synced()                                 │
//! │                                                                         │
//! │  lock ──► already synced this process? ──yes──► AlreadySynced          │
//! │                  │ no                                                   │
//! │                  ▼                                                      │
//! │           ensure_schema()                                              │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │           store empty? ──no──► LoadedFromCache   (no network)          │
//! │                  │ yes                                                  │
//! │                  ▼                                                      │
//! │           fetch() ──err──► SyncError, store still empty                │
//! │                  │ ok                                                   │
//! │                  ▼                                                      │
//! │           insert_all() (one transaction) ──► Fetched                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A populated store is never refreshed automatically. `resync()` and
//! `invalidate()` are the manual ways out.
//!
//! ## Concurrency
//! Every entry point takes the same async mutex, so at most one sync is in
//! flight and a second caller waits, then sees `AlreadySynced`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::SyncResult;
use crate::fetcher::CatalogSource;
use lemon_db::Database;

// =============================================================================
// Outcome & Status
// =============================================================================

/// What `ensure_synced` had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// A previous call in this process already synced.
    AlreadySynced,

    /// The store was populated by an earlier run; nothing was fetched.
    LoadedFromCache { count: i64 },

    /// The store was empty and has been filled from the remote catalog.
    Fetched { count: usize },
}

impl SyncOutcome {
    /// Whether this call went to the network.
    pub fn fetched(&self) -> bool {
        matches!(self, SyncOutcome::Fetched { .. })
    }
}

/// Snapshot of sync state for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    /// The sync-once latch is set.
    pub synced: bool,

    /// Items currently in the store.
    pub item_count: i64,

    /// When this process last wrote a fetched catalog.
    pub last_synced_at: Option<DateTime<Utc>>,

    /// Message of the most recent failed attempt, cleared on success.
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
struct SyncState {
    synced: bool,
    last_synced_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl SyncState {
    fn record<T>(&mut self, result: SyncResult<T>) -> SyncResult<T> {
        if let Err(e) = &result {
            warn!(error = %e, retryable = e.is_retryable(), "Catalog sync failed");
            self.last_error = Some(e.to_string());
        }
        result
    }

    fn mark_synced(&mut self, wrote: bool) {
        self.synced = true;
        self.last_error = None;
        if wrote {
            self.last_synced_at = Some(Utc::now());
        }
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Fills the local store from a [`CatalogSource`], at most once per process.
pub struct SyncOrchestrator<S> {
    db: Database,
    source: S,
    state: Mutex<SyncState>,
}

impl<S: CatalogSource> SyncOrchestrator<S> {
    pub fn new(db: Database, source: S) -> Self {
        SyncOrchestrator {
            db,
            source,
            state: Mutex::new(SyncState::default()),
        }
    }

    /// The store this orchestrator fills.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Makes sure the store holds a catalog.
    ///
    /// ## Errors
    /// * `SyncError::Fetch` - the remote catalog was unavailable or malformed
    /// * `SyncError::Storage` - schema or batch write failed
    ///
    /// In both cases the store is left empty and calling again retries.
    pub async fn ensure_synced(&self) -> SyncResult<SyncOutcome> {
        let mut state = self.state.lock().await;

        if state.synced {
            debug!("Catalog already synced in this process");
            return Ok(SyncOutcome::AlreadySynced);
        }

        let outcome = state.record(self.fill_if_empty().await)?;
        state.mark_synced(outcome.fetched());
        Ok(outcome)
    }

    async fn fill_if_empty(&self) -> SyncResult<SyncOutcome> {
        self.db.ensure_schema().await?;

        let menu = self.db.menu();
        if !menu.is_empty().await? {
            let count = menu.count().await?;
            info!(count, "Using cached catalog");
            return Ok(SyncOutcome::LoadedFromCache { count });
        }

        info!("Cache empty, fetching remote catalog");
        let items = self.source.fetch().await?;
        menu.insert_all(&items).await?;

        Ok(SyncOutcome::Fetched { count: items.len() })
    }

    /// Fetches the catalog again and swaps it in atomically.
    ///
    /// If the fetch or the write fails, the previous catalog stays in place.
    pub async fn resync(&self) -> SyncResult<usize> {
        let mut state = self.state.lock().await;

        let result: SyncResult<usize> = async {
            self.db.ensure_schema().await?;
            let items = self.source.fetch().await?;
            self.db.menu().replace_all(&items).await?;
            Ok(items.len())
        }
        .await;

        let count = state.record(result)?;
        state.mark_synced(true);

        info!(count, "Catalog resynced");
        Ok(count)
    }

    /// Empties the store and resets the sync-once latch.
    ///
    /// The next `ensure_synced` fetches again. Returns the number of items
    /// removed.
    pub async fn invalidate(&self) -> SyncResult<u64> {
        let mut state = self.state.lock().await;

        self.db.ensure_schema().await?;
        let removed = self.db.menu().clear().await?;

        state.synced = false;
        info!(removed, "Catalog cache invalidated");
        Ok(removed)
    }

    /// Current sync state.
    ///
    /// Creates the schema if nothing has yet, so a fresh store reports zero
    /// items. Any other store failure is returned.
    pub async fn status(&self) -> SyncResult<SyncStatus> {
        let state = self.state.lock().await;

        self.db.ensure_schema().await?;
        let item_count = self.db.menu().count().await?;

        Ok(SyncStatus {
            synced: state.synced,
            item_count,
            last_synced_at: state.last_synced_at,
            last_error: state.last_error.clone(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
