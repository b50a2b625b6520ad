//! # Catalog Service
//!
//! The one object presentation code talks to.
//!
//! ```text
//! startup()
//!   └─► SyncOrchestrator::ensure_synced()
//!   └─► view(FilterState::default())
//!
//! view(state)
//!   └─► validate query text
//!   └─► QueryFilterEngine::apply(state)
//!   └─► group_sections(items)          → [Starters, Mains, Desserts]
//! ```
//!
//! Views are pulled, not pushed: call `view` again whenever the filter state
//! changes. Typed text should go through [`SearchDebouncer`] first.

use tokio::sync::mpsc;
use tracing::debug;

use crate::config::CatalogConfig;
use crate::debounce::SearchDebouncer;
use crate::error::SyncResult;
use crate::fetcher::{CatalogSource, RemoteCatalogFetcher};
use crate::orchestrator::SyncOrchestrator;
use lemon_core::validation::validate_search_query_with_limit;
use lemon_core::{group_sections, FilterState, MenuItem, Section};
use lemon_db::{Database, DbConfig, QueryFilterEngine};

/// Sync policy, filtering and grouping behind one handle.
pub struct CatalogService<S> {
    orchestrator: SyncOrchestrator<S>,
    engine: QueryFilterEngine,
    config: CatalogConfig,
}

impl CatalogService<RemoteCatalogFetcher> {
    /// Opens the configured database and wires up the HTTP fetcher.
    pub async fn open(config: CatalogConfig) -> SyncResult<Self> {
        let db = Database::new(DbConfig::new(config.database_path())).await?;
        let fetcher = RemoteCatalogFetcher::from_config(&config)?;
        Ok(Self::new(db, fetcher, config))
    }
}

impl<S: CatalogSource> CatalogService<S> {
    pub fn new(db: Database, source: S, config: CatalogConfig) -> Self {
        CatalogService {
            engine: db.query_engine(),
            orchestrator: SyncOrchestrator::new(db, source),
            config,
        }
    }

    /// Ensures the cache is populated, then returns the unfiltered view.
    pub async fn startup(&self) -> SyncResult<Vec<Section>> {
        self.orchestrator.ensure_synced().await?;
        self.view(&FilterState::default()).await
    }

    /// Sections for the given filter state.
    ///
    /// Query text is trimmed and must fit `search.max_query_len`.
    pub async fn view(&self, state: &FilterState) -> SyncResult<Vec<Section>> {
        let query_text =
            validate_search_query_with_limit(&state.query_text, self.config.search.max_query_len)?;

        let state = FilterState {
            query_text,
            facet_selections: state.facet_selections.clone(),
        };

        let items = self.engine.apply(&state).await?;
        debug!(count = items.len(), "View refreshed");

        Ok(group_sections(&items))
    }

    /// A debouncer using the configured window.
    pub fn debouncer(&self, downstream: mpsc::Sender<String>) -> SearchDebouncer {
        SearchDebouncer::spawn(self.config.debounce_window(), downstream)
    }

    /// Fetchable URL for an item's image.
    pub fn image_url(&self, item: &MenuItem) -> String {
        self.config.image_url(item)
    }

    pub fn orchestrator(&self) -> &SyncOrchestrator<S> {
        &self.orchestrator
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, SyncError};
    use crate::test_support::{sample_menu, CountingSource};
    use lemon_core::Category;
    use std::time::Duration;

    async fn service(source: CountingSource) -> CatalogService<CountingSource> {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        CatalogService::new(db, source, CatalogConfig::default())
    }

    fn counts(sections: &[Section]) -> Vec<(Category, usize)> {
        sections.iter().map(|s| (s.category, s.items.len())).collect()
    }

    #[tokio::test]
    async fn test_startup_builds_initial_view() {
        let source = CountingSource::ok(sample_menu());
        let service = service(source.clone()).await;

        let sections = service.startup().await.unwrap();

        assert_eq!(
            counts(&sections),
            vec![
                (Category::Starters, 2),
                (Category::Mains, 2),
                (Category::Desserts, 1)
            ]
        );

        service.startup().await.unwrap();
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_view_filters_and_groups() {
        let service = service(CountingSource::ok(sample_menu())).await;
        service.startup().await.unwrap();

        let state = FilterState::new().with_query("  GREEK ");
        let sections = service.view(&state).await.unwrap();

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].items.len(), 1);
        assert_eq!(sections[0].items[0].name, "Greek Salad");
        assert!(sections[1].is_empty());
        assert!(sections[2].is_empty());

        let state = FilterState::new().with_facets([Category::Desserts]);
        let sections = service.view(&state).await.unwrap();
        assert_eq!(
            counts(&sections),
            vec![
                (Category::Starters, 0),
                (Category::Mains, 0),
                (Category::Desserts, 1)
            ]
        );
    }

    #[tokio::test]
    async fn test_view_rejects_overlong_query() {
        let service = service(CountingSource::ok(sample_menu())).await;
        service.startup().await.unwrap();

        let state = FilterState::new().with_query("x".repeat(101));
        let err = service.view(&state).await.unwrap_err();

        assert!(matches!(err, SyncError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn test_startup_failure_surfaces() {
        let service = service(CountingSource::failing(FetchError::Format("bad".into()))).await;

        let err = service.startup().await.unwrap_err();
        assert!(matches!(err, SyncError::Fetch(FetchError::Format(_))));
    }

    #[tokio::test]
    async fn test_debounced_text_drives_view() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut config = CatalogConfig::default();
        config.search.debounce_ms = 20;
        let service = CatalogService::new(db, CountingSource::ok(sample_menu()), config);
        service.startup().await.unwrap();

        let (tx, mut rx) = mpsc::channel(4);
        let debouncer = service.debouncer(tx);
        assert_eq!(debouncer.window(), Duration::from_millis(20));

        debouncer.submit("p").unwrap();
        debouncer.submit("pa").unwrap();
        debouncer.submit("pas").unwrap();

        let text = rx.recv().await.unwrap();
        assert_eq!(text, "pas");

        let sections = service
            .view(&FilterState::new().with_query(text))
            .await
            .unwrap();

        assert_eq!(sections[1].items.len(), 1);
        assert_eq!(sections[1].items[0].name, "Pasta");
    }
}
