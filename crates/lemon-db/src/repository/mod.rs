//! # Repository Module
//!
//! Database repository implementations for the menu cache.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  SyncOrchestrator / CatalogService                                     │
//! │       │                                                                 │
//! │       │  db.menu().query("sal", &categories)                           │
//! │       ▼                                                                 │
//! │  MenuRepository                                                        │
//! │  ├── is_empty / count                                                  │
//! │  ├── insert_all / replace_all / clear                                  │
//! │  └── scan_all / query                                                  │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  SQL lives only here; callers speak in MenuItem and Category.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`MenuRepository`](menu::MenuRepository) - Cached menu items
//! - [`ProfileRepository`](profile::ProfileRepository) - Persisted session profile

pub mod menu;
pub mod profile;
