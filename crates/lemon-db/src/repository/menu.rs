//! # Menu Repository
//!
//! Database operations for cached menu items.
//!
//! ## Key Operations
//! - All-or-nothing bulk insert
//! - Full scan in id order
//! - Name substring + category query
//!
//! ## Query Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How the Menu Query Works                             │
//! │                                                                         │
//! │  User types: "sal", facets: {starters}                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SELECT ... FROM menu_items                                            │
//! │  WHERE name_folded LIKE '%' || 'sal' || '%' ESCAPE '\'                 │
//! │    AND category IN ('starters')                                        │
//! │  ORDER BY id                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────────────────┐                              │
//! │  │ 1 │ Greek Salad   │ starters │ ← MATCH                              │
//! │  │ 2 │ Bruschetta    │ starters │                                      │
//! │  │ 3 │ Grilled Fish  │ mains    │                                      │
//! │  └──────────────────────────────────────┘                              │
//! │                                                                         │
//! │  Both sides are lowercased in Rust, so "SAL" and "CRÈME" match too.    │
//! │  '%' and '_' typed by the user are escaped and match literally.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use lemon_core::validation::validate_price_cents;
use lemon_core::{Category, MenuItem};

const SELECT_COLUMNS: &str = "SELECT id, name, price_cents, description, image, category FROM menu_items";

/// Repository for menu item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.menu();
///
/// if repo.is_empty().await? {
///     repo.insert_all(&fetched).await?;
/// }
/// let mains = repo.query("", &[Category::Mains].into()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

impl MenuRepository {
    /// Creates a new MenuRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MenuRepository { pool }
    }

    /// Counts stored items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Whether the cache holds no items at all.
    pub async fn is_empty(&self) -> DbResult<bool> {
        Ok(self.count().await? == 0)
    }

    /// Inserts a whole catalog in one transaction.
    ///
    /// ## All or Nothing
    /// ```text
    /// BEGIN
    ///   INSERT item 1  ✓
    ///   INSERT item 2  ✓
    ///   INSERT item 3  ✗ (duplicate id)
    /// ROLLBACK         → store unchanged, DbError::WriteFailed
    /// ```
    pub async fn insert_all(&self, items: &[MenuItem]) -> DbResult<()> {
        debug!(count = items.len(), "Inserting menu items");

        let result: DbResult<()> = async {
            let mut tx = self.pool.begin().await?;
            insert_batch(&mut *tx, items).await?;
            tx.commit().await?;
            Ok(())
        }
        .await;

        match result {
            Ok(()) => {
                info!(count = items.len(), "Menu items stored");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Menu insert rolled back");
                Err(DbError::write_failed(e))
            }
        }
    }

    /// Swaps the stored catalog for `items` in one transaction.
    ///
    /// Readers see either the old catalog or the new one. On failure the old
    /// catalog is kept.
    pub async fn replace_all(&self, items: &[MenuItem]) -> DbResult<()> {
        debug!(count = items.len(), "Replacing menu items");

        let result: DbResult<()> = async {
            let mut tx = self.pool.begin().await?;
            sqlx::query("DELETE FROM menu_items")
                .execute(&mut *tx)
                .await?;
            insert_batch(&mut *tx, items).await?;
            tx.commit().await?;
            Ok(())
        }
        .await;

        result.map_err(|e| {
            warn!(error = %e, "Menu replace rolled back");
            DbError::write_failed(e)
        })?;

        info!(count = items.len(), "Menu items replaced");
        Ok(())
    }

    /// Removes every cached item. Returns how many were removed.
    pub async fn clear(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM menu_items")
            .execute(&self.pool)
            .await
            .map_err(DbError::write_failed)?;

        info!(removed = result.rows_affected(), "Menu cache cleared");
        Ok(result.rows_affected())
    }

    /// Returns every item in ascending id order.
    pub async fn scan_all(&self) -> DbResult<Vec<MenuItem>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY id");
        let items = sqlx::query_as::<_, MenuItem>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Items whose name contains `text` and whose category is in `categories`.
    ///
    /// ## Matching
    /// - Case-insensitive substring on `name` (full Unicode lowercasing, via
    ///   the `name_folded` column); empty `text` matches every name
    /// - `categories` is taken literally: an empty set matches nothing.
    ///   "No facet selected means all" is applied one layer up, in
    ///   [`QueryFilterEngine`](crate::QueryFilterEngine).
    ///
    /// Results are in ascending id order.
    pub async fn query(
        &self,
        text: &str,
        categories: &BTreeSet<Category>,
    ) -> DbResult<Vec<MenuItem>> {
        debug!(
            text = %text,
            categories = ?categories,
            "Querying menu items"
        );

        if categories.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_COLUMNS);
        builder.push(" WHERE name_folded LIKE '%' || ");
        builder.push_bind(escape_like(&text.to_lowercase()));
        builder.push(" || '%' ESCAPE '\\' AND category IN (");

        let mut separated = builder.separated(", ");
        for category in categories {
            separated.push_bind(category.as_str());
        }
        separated.push_unseparated(") ORDER BY id");

        let items = builder
            .build_query_as::<MenuItem>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = items.len(), "Query returned items");
        Ok(items)
    }
}

/// Inserts rows on an open transaction. The caller commits.
async fn insert_batch(conn: &mut SqliteConnection, items: &[MenuItem]) -> DbResult<()> {
    for item in items {
        validate_price_cents(item.price_cents)?;

        sqlx::query(
            r#"
            INSERT INTO menu_items (id, name, name_folded, price_cents, description, image, category)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(item.name.to_lowercase())
        .bind(item.price_cents)
        .bind(&item.description)
        .bind(&item.image)
        .bind(item.category.as_str())
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Makes `%`, `_` and `\` in user text match literally under `ESCAPE '\'`.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::test_support::{item, sample_menu};

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.menu().insert_all(&sample_menu()).await.unwrap();
        db
    }

    fn names(items: &[MenuItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("salad"), "salad");
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
    }

    #[tokio::test]
    async fn test_insert_then_scan_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.menu();
        assert!(repo.is_empty().await.unwrap());

        // Insert out of order; scan must come back by id
        let mut items = sample_menu();
        items.reverse();
        repo.insert_all(&items).await.unwrap();

        assert!(!repo.is_empty().await.unwrap());
        assert_eq!(repo.scan_all().await.unwrap(), sample_menu());
    }

    #[tokio::test]
    async fn test_insert_is_all_or_nothing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.menu();

        let mut items = sample_menu();
        items.push(item(2, "Duplicate", Category::Mains));

        let err = repo.insert_all(&items).await.unwrap_err();
        assert!(matches!(err, DbError::WriteFailed(_)));
        assert!(repo.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_rejects_existing_ids() {
        let db = seeded().await;

        let err = db
            .menu()
            .insert_all(&[item(1, "Again", Category::Starters)])
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::WriteFailed(_)));
        assert_eq!(db.menu().count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_query_is_case_insensitive_substring() {
        let db = seeded().await;
        let repo = db.menu();
        let all = Category::all();

        for text in ["greek", "GREEK", "k sal"] {
            let found = repo.query(text, &all).await.unwrap();
            assert_eq!(names(&found), vec!["Greek Salad"], "query {text:?}");
        }

        assert!(repo.query("xyz", &all).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_folds_non_ascii_case() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.menu()
            .insert_all(&[
                item(1, "Crème Brûlée", Category::Desserts),
                item(2, "ÉCLAIR", Category::Desserts),
            ])
            .await
            .unwrap();
        let all = Category::all();

        for text in ["crème", "CRÈME", "BRÛLÉE", "Crème Brûlée"] {
            let found = db.menu().query(text, &all).await.unwrap();
            assert_eq!(names(&found), vec!["Crème Brûlée"], "query {text:?}");
        }

        let found = db.menu().query("éclair", &all).await.unwrap();
        assert_eq!(names(&found), vec!["ÉCLAIR"]);
    }

    #[tokio::test]
    async fn test_insert_rejects_negative_price() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.menu();

        let mut items = sample_menu();
        items[3].price_cents = -1;

        match repo.insert_all(&items).await.unwrap_err() {
            DbError::WriteFailed(msg) => assert!(msg.contains("price"), "{msg}"),
            other => panic!("expected WriteFailed, got {other:?}"),
        }
        assert!(repo.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_query_empty_text_matches_everything() {
        let db = seeded().await;

        let found = db.menu().query("", &Category::all()).await.unwrap();
        assert_eq!(found, sample_menu());
    }

    #[tokio::test]
    async fn test_query_filters_by_category() {
        let db = seeded().await;

        let mains = BTreeSet::from([Category::Mains]);
        let found = db.menu().query("", &mains).await.unwrap();

        assert_eq!(names(&found), vec!["Grilled Fish", "Pasta"]);
        assert!(found.iter().all(|i| i.category == Category::Mains));
    }

    #[tokio::test]
    async fn test_query_with_no_categories_is_empty() {
        let db = seeded().await;

        let found = db.menu().query("", &BTreeSet::new()).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_query_treats_wildcards_literally() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.menu()
            .insert_all(&[
                item(1, "100% Lemon", Category::Desserts),
                item(2, "Lemon Tart", Category::Desserts),
            ])
            .await
            .unwrap();

        let found = db.menu().query("%", &Category::all()).await.unwrap();
        assert_eq!(names(&found), vec!["100% Lemon"]);

        let found = db.menu().query("_", &Category::all()).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_replace_all_swaps_catalog() {
        let db = seeded().await;
        let repo = db.menu();

        let fresh = vec![item(1, "Lemon Dessert", Category::Desserts)];
        repo.replace_all(&fresh).await.unwrap();
        assert_eq!(repo.scan_all().await.unwrap(), fresh);

        // A bad batch keeps what was there
        let bad = vec![
            item(1, "One", Category::Mains),
            item(1, "Also One", Category::Mains),
        ];
        assert!(repo.replace_all(&bad).await.is_err());
        assert_eq!(repo.scan_all().await.unwrap(), fresh);
    }

    #[tokio::test]
    async fn test_clear() {
        let db = seeded().await;

        assert_eq!(db.menu().clear().await.unwrap(), 5);
        assert!(db.menu().is_empty().await.unwrap());
    }
}
