//! # Error Types
//!
//! Domain-specific error types for lemon-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  lemon-core errors (this file)                                          │
//! │  ├── CoreError        - Domain rule violations                          │
//! │  └── ValidationError  - Field-level validation failures                 │
//! │                                                                         │
//! │  lemon-db errors (separate crate)                                       │
//! │  └── DbError          - Storage failures                                │
//! │                                                                         │
//! │  lemon-sync errors (separate crate)                                     │
//! │  ├── FetchError       - Network / response format failures              │
//! │  └── SyncError        - Orchestration failures                          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → FetchError::Format → SyncError     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Category text is not one of starters, mains, desserts.
    ///
    /// ## When This Occurs
    /// - The remote menu contains a category we do not display
    /// - A stored row was edited by hand
    #[error("Unknown category: '{0}'")]
    UnknownCategory(String),

    /// Price text could not be read as a non-negative decimal amount.
    #[error("Invalid price '{value}': {reason}")]
    InvalidPrice { value: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
