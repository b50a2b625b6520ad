//! # lemon-sync: Catalog Sync Engine
//!
//! Fills the local store from the remote menu once, and turns user input
//! into grouped, filtered views.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Sync Architecture                        │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 CatalogService (presentation entry)              │  │
//! │  │                                                                  │  │
//! │  │  startup() → ensure_synced + default view                       │  │
//! │  │  view(state) → query + group                                    │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │SyncOrchestrator│  │ RemoteCatalog- │  │  SearchDebouncer       │    │
//! │  │                │  │ Fetcher        │  │                        │    │
//! │  │ Sync-once      │─►│ HTTP GET +     │  │ Quiescence window,     │    │
//! │  │ latch, manual  │  │ schema check   │  │ last value wins        │    │
//! │  │ resync         │  │                │  │                        │    │
//! │  └───────┬────────┘  └────────────────┘  └────────────────────────┘    │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  lemon-db (MenuRepository, QueryFilterEngine)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Catalog configuration (URL, debounce window, db path)
//! - [`error`] - Fetch and sync error types
//! - [`fetcher`] - `CatalogSource` trait and the HTTP fetcher
//! - [`orchestrator`] - Cache-empty-only sync policy
//! - [`debounce`] - Search input debouncer
//! - [`service`] - `CatalogService` facade
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lemon_sync::{CatalogConfig, CatalogService};
//! use lemon_core::FilterState;
//!
//! let service = CatalogService::open(CatalogConfig::load_or_default(None)).await?;
//!
//! let sections = service.startup().await?;
//! for section in &sections {
//!     println!("{}: {} items", section.title(), section.items.len());
//! }
//!
//! let filtered = service.view(&FilterState::new().with_query("salad")).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod debounce;
pub mod error;
pub mod fetcher;
pub mod orchestrator;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::CatalogConfig;
pub use debounce::{DebounceToken, SearchDebouncer};
pub use error::{FetchError, SyncError, SyncResult};
pub use fetcher::{parse_catalog, CatalogSource, RemoteCatalogFetcher};
pub use orchestrator::{SyncOrchestrator, SyncOutcome, SyncStatus};
pub use service::CatalogService;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use lemon_core::{Category, MenuItem};

    use crate::error::FetchError;
    use crate::fetcher::CatalogSource;

    /// In-memory catalog source that counts how often it was asked.
    #[derive(Clone)]
    pub struct CountingSource {
        calls: Arc<AtomicUsize>,
        response: Arc<Mutex<Result<Vec<MenuItem>, FetchError>>>,
    }

    impl CountingSource {
        pub fn ok(items: Vec<MenuItem>) -> Self {
            Self::with_response(Ok(items))
        }

        pub fn failing(err: FetchError) -> Self {
            Self::with_response(Err(err))
        }

        fn with_response(response: Result<Vec<MenuItem>, FetchError>) -> Self {
            CountingSource {
                calls: Arc::new(AtomicUsize::new(0)),
                response: Arc::new(Mutex::new(response)),
            }
        }

        pub fn set_response(&self, response: Result<Vec<MenuItem>, FetchError>) {
            *self.response.lock().unwrap() = response;
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CatalogSource for CountingSource {
        async fn fetch(&self) -> Result<Vec<MenuItem>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.lock().unwrap().clone()
        }
    }

    fn item(id: i64, name: &str, price_cents: i64, category: Category) -> MenuItem {
        MenuItem {
            id,
            name: name.to_string(),
            price_cents,
            description: String::new(),
            image: format!("{}.jpg", name.to_lowercase().replace(' ', "_")),
            category,
        }
    }

    pub fn sample_menu() -> Vec<MenuItem> {
        vec![
            item(1, "Greek Salad", 1299, Category::Starters),
            item(2, "Bruschetta", 799, Category::Starters),
            item(3, "Grilled Fish", 2000, Category::Mains),
            item(4, "Pasta", 1850, Category::Mains),
            item(5, "Lemon Dessert", 550, Category::Desserts),
        ]
    }
}
