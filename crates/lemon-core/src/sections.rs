//! # Section Grouping
//!
//! Turns a flat, id-ordered item list into the three fixed menu sections.
//!
//! ```text
//! items (id order)                         sections (fixed order)
//! ┌───┬──────────────┬──────────┐          ┌──────────┬──────────────┐
//! │ 1 │ Greek Salad  │ starters │          │ starters │ 1, 2         │
//! │ 2 │ Bruschetta   │ starters │   ──►    │ mains    │ 3, 4         │
//! │ 3 │ Grilled Fish │ mains    │          │ desserts │ 5            │
//! │ 4 │ Pasta        │ mains    │          └──────────┴──────────────┘
//! │ 5 │ Lemon Dessert│ desserts │
//! └───┴──────────────┴──────────┘
//! ```
//!
//! Empty sections are kept; hiding them is a display decision.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Category, MenuItem};

/// One category's slice of the current view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Section {
    pub category: Category,
    pub items: Vec<MenuItem>,
}

impl Section {
    /// Header text for this section.
    pub fn title(&self) -> &'static str {
        self.category.title()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Groups items into one section per category, in fixed category order.
///
/// Relative order inside each section is the order of `items`.
pub fn group_sections(items: &[MenuItem]) -> Vec<Section> {
    Category::ALL
        .iter()
        .map(|&category| Section {
            category,
            items: items
                .iter()
                .filter(|item| item.category == category)
                .cloned()
                .collect(),
        })
        .collect()
}
