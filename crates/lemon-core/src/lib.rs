//! # lemon-core: Pure Domain Logic for the Lemon Menu Cache
//!
//! This crate holds the menu data model and every rule that can be expressed
//! without I/O: price handling, the facet rule, and section grouping.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Lemon Menu Cache Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation (out of scope)                     │   │
//! │  │    Search bar ──► Facet toggles ──► Sectioned menu list         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ FilterState / Vec<Section>             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        lemon-sync (fetch, sync policy, debouncer)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        lemon-db (SQLite store, query engine)                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ lemon-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ sections  │  │ validation│  │   │
//! │  │   │ MenuItem  │  │   Money   │  │  Section  │  │   rules   │  │   │
//! │  │   │ Category  │  │  parsing  │  │ grouping  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (MenuItem, Category, FilterState)
//! - [`money`] - Money type with integer arithmetic and decimal parsing
//! - [`sections`] - Fixed-order category sections for display
//! - [`session`] - The profile/session capability consumed by the app
//! - [`error`] - Domain error types
//! - [`validation`] - Ingest and input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use lemon_core::{group_sections, Category, FilterState};
//!
//! // No facet selected means every category is active
//! let state = FilterState::default();
//! assert_eq!(state.effective_categories().len(), 3);
//!
//! // Grouping always yields the three fixed sections
//! let sections = group_sections(&[]);
//! assert_eq!(sections.len(), 3);
//! assert_eq!(sections[0].category, Category::Starters);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod sections;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use sections::{group_sections, Section};
pub use session::{Profile, Session};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default quiescence window for search input, in milliseconds.
///
/// A keystroke burst is delivered downstream only after this much silence.
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

/// Maximum accepted length of the search text, in characters.
pub const MAX_QUERY_LEN: usize = 100;
