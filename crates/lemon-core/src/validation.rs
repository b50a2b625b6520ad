//! # Validation Module
//!
//! Validation for data entering the cache, from either side.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Remote menu (ingest)                 Search bar (input)               │
//! │  ├── name present                     └── length cap, trimmed          │
//! │  ├── price ≥ 0                                                         │
//! │  └── category in fixed set                                             │
//! │           │                                   │                         │
//! │           ▼                                   ▼                         │
//! │  THIS MODULE: field rules             THIS MODULE: query rules         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  SQLite: NOT NULL, CHECK(price_cents >= 0), CHECK(category IN ...)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::session::Profile;
use crate::MAX_QUERY_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum accepted length of an item name.
pub const MAX_ITEM_NAME_LEN: usize = 200;

// =============================================================================
// Ingest Validators
// =============================================================================

/// Validates a menu item name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use lemon_core::validation::validate_item_name;
///
/// assert!(validate_item_name("Greek Salad").is_ok());
/// assert!(validate_item_name("   ").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_ITEM_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_ITEM_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Input Validators
// =============================================================================

/// Validates search text with the default length cap.
///
/// ## Returns
/// The trimmed query string. Empty is valid and means "match everything".
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    validate_search_query_with_limit(query, MAX_QUERY_LEN)
}

/// Validates search text against an explicit length cap.
pub fn validate_search_query_with_limit(query: &str, max: usize) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max,
        });
    }

    Ok(query.to_string())
}

/// Validates a profile handed to onboarding.
///
/// An empty profile would leave the user un-onboarded, so it is refused.
pub fn validate_profile(profile: &Profile) -> ValidationResult<()> {
    if profile.is_empty() {
        return Err(ValidationError::Required {
            field: "profile".to_string(),
        });
    }

    if profile.keys().any(|k| k.trim().is_empty()) {
        return Err(ValidationError::InvalidFormat {
            field: "profile".to_string(),
            reason: "keys must not be blank".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
