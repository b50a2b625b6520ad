//! # Domain Types
//!
//! Core domain types used throughout the menu cache.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    MenuItem     │   │    Category     │   │   FilterState   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (1-based)   │   │  Starters       │   │  query_text     │       │
//! │  │  name           │   │  Mains          │   │  facet_         │       │
//! │  │  price_cents    │   │  Desserts       │   │   selections    │       │
//! │  │  description    │   └─────────────────┘   └─────────────────┘       │
//! │  │  image          │                                                   │
//! │  │  category       │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! `MenuItem::id` is the 1-based position of the item in the remote menu at
//! ingest time. It is never regenerated once stored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// Menu category. The set is closed; anything else is rejected at ingest.
///
/// Declaration order is display order, and `Ord` follows it, so a
/// `BTreeSet<Category>` iterates starters → mains → desserts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Starters,
    Mains,
    Desserts,
}

impl Category {
    /// Every category, in fixed display order.
    pub const ALL: [Category; 3] = [Category::Starters, Category::Mains, Category::Desserts];

    /// Wire/storage representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Starters => "starters",
            Category::Mains => "mains",
            Category::Desserts => "desserts",
        }
    }

    /// Section header text.
    pub const fn title(&self) -> &'static str {
        match self {
            Category::Starters => "Starters",
            Category::Mains => "Mains",
            Category::Desserts => "Desserts",
        }
    }

    /// The full category set.
    pub fn all() -> BTreeSet<Category> {
        Category::ALL.into_iter().collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "starters" => Ok(Category::Starters),
            "mains" => Ok(Category::Mains),
            "desserts" => Ok(Category::Desserts),
            _ => Err(CoreError::UnknownCategory(s.to_string())),
        }
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// A single dish on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct MenuItem {
    /// 1-based position in the remote menu at ingest.
    pub id: i64,

    /// Display name; the field the search text matches against.
    pub name: String,

    /// Price in cents (never negative).
    pub price_cents: i64,

    pub description: String,

    /// Opaque image filename, resolved against the image base URL by callers.
    pub image: String,

    pub category: Category,
}

impl MenuItem {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Filter State
// =============================================================================

/// What the user currently asked to see.
///
/// An empty `facet_selections` means "every category", never "nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FilterState {
    /// Search text, possibly empty.
    pub query_text: String,

    /// Toggled-on category facets, possibly empty.
    pub facet_selections: BTreeSet<Category>,
}

impl FilterState {
    /// Creates an unfiltered state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the search text.
    pub fn with_query(mut self, text: impl Into<String>) -> Self {
        self.query_text = text.into();
        self
    }

    /// Selects the given facets.
    pub fn with_facets(mut self, facets: impl IntoIterator<Item = Category>) -> Self {
        self.facet_selections = facets.into_iter().collect();
        self
    }

    /// Flips one facet toggle. Returns whether the facet is now selected.
    pub fn toggle_facet(&mut self, category: Category) -> bool {
        if self.facet_selections.remove(&category) {
            false
        } else {
            self.facet_selections.insert(category);
            true
        }
    }

    /// Categories the store query should match.
    ///
    /// ## The Facet Rule
    /// ```text
    /// selections = {}              → {starters, mains, desserts}
    /// selections = {mains}         → {mains}
    /// selections = {mains, desserts} → {mains, desserts}
    /// ```
    pub fn effective_categories(&self) -> BTreeSet<Category> {
        if self.facet_selections.is_empty() {
            Category::all()
        } else {
            self.facet_selections.clone()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
