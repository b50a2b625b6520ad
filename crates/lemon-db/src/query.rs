//! # Query Filter Engine
//!
//! Turns the user's [`FilterState`] into a store query.
//!
//! ```text
//! FilterState { query_text: "sa", facet_selections: {} }
//!       │
//!       │  effective = selections, or ALL when nothing is selected
//!       ▼
//! MenuRepository::query("sa", {starters, mains, desserts})
//!       │
//!       ▼
//! Vec<MenuItem> (id order) ──► group_sections()
//! ```
//!
//! No result caching: every call goes to SQLite, so the view always reflects
//! current store contents.

use tracing::debug;

use crate::error::DbResult;
use crate::repository::menu::MenuRepository;
use lemon_core::{FilterState, MenuItem};

/// Applies filter state to the local store.
#[derive(Debug, Clone)]
pub struct QueryFilterEngine {
    menu: MenuRepository,
}

impl QueryFilterEngine {
    pub fn new(menu: MenuRepository) -> Self {
        QueryFilterEngine { menu }
    }

    /// Items matching `state`, in ascending id order.
    ///
    /// An empty facet selection behaves exactly like selecting every facet.
    pub async fn apply(&self, state: &FilterState) -> DbResult<Vec<MenuItem>> {
        let categories = state.effective_categories();

        debug!(
            query = %state.query_text,
            selected = state.facet_selections.len(),
            "Applying filter state"
        );

        self.menu.query(&state.query_text, &categories).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::test_support::sample_menu;
    use lemon_core::Category;

    async fn engine() -> QueryFilterEngine {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.menu().insert_all(&sample_menu()).await.unwrap();
        db.query_engine()
    }

    #[tokio::test]
    async fn test_default_state_returns_everything() {
        let engine = engine().await;

        let items = engine.apply(&FilterState::default()).await.unwrap();
        assert_eq!(items, sample_menu());
    }

    #[tokio::test]
    async fn test_no_facets_equals_all_facets() {
        let engine = engine().await;

        for text in ["", "a", "LEMON", "zzz"] {
            let none = FilterState::new().with_query(text);
            let all = FilterState::new()
                .with_query(text)
                .with_facets(Category::ALL);

            assert_eq!(
                engine.apply(&none).await.unwrap(),
                engine.apply(&all).await.unwrap(),
                "query {text:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_text_and_facets_combine() {
        let engine = engine().await;

        let state = FilterState::new()
            .with_query("s")
            .with_facets([Category::Starters, Category::Mains]);
        let ids: Vec<i64> = engine
            .apply(&state)
            .await
            .unwrap()
            .iter()
            .map(|i| i.id)
            .collect();

        // "Greek Salad", "Bruschetta", "Grilled Fish", "Pasta" all contain an s
        assert_eq!(ids, vec![1, 2, 3, 4]);

        let desserts = FilterState::new()
            .with_query("s")
            .with_facets([Category::Desserts]);
        let found = engine.apply(&desserts).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Lemon Dessert");
    }
}
