//! # Error Types
//!
//! Domain-specific error types for balcao-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  balcao-core errors (this file)                                     │
//! │  ├── CoreError        - Lifecycle and amount violations             │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  balcao-db errors (separate crate)                                  │
//! │  └── StoreError       - Record store failures (NotFound, Conflict)  │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → StoreError → caller            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (session id, receivable id, cents)
//! 3. Errors are enum variants, never String
//! 4. Never retried here - propagation is the caller's concern

use thiserror::Error;

use crate::types::{MovementKind, SessionStatus};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent lifecycle-state and amount violations. Storage-level
/// failures (not-found, uniqueness conflicts) live in `balcao-db`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Operation attempted against a session that is not open.
    ///
    /// ## When This Occurs
    /// - Recording a movement on a closed session
    /// - Closing an already-closed session
    #[error("cash session {session_id} is not open (status: {status})")]
    SessionNotOpen {
        session_id: String,
        status: SessionStatus,
    },

    /// Movement kind cannot be appended by callers.
    ///
    /// Opening and closing entries are written exclusively by the
    /// open/close transitions themselves.
    #[error("movement kind '{kind}' cannot be recorded manually")]
    MovementNotRecordable { kind: MovementKind },

    /// Settlement attempted on a receivable that is no longer pending.
    ///
    /// Settling twice must be rejected, never silently re-applied.
    #[error("receivable {receivable_id} is already settled")]
    AlreadySettled { receivable_id: String },

    /// Non-positive or otherwise malformed amount where a positive
    /// amount is required.
    #[error("invalid amount for {field}: {cents} cents")]
    InvalidAmount { field: &'static str, cents: i64 },

    /// Per-item discount larger than the receivable's outstanding value.
    #[error(
        "discount of {discount_cents} cents exceeds receivable {receivable_id} value of {value_cents} cents"
    )]
    DiscountExceedsValue {
        receivable_id: String,
        discount_cents: i64,
        value_cents: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., invalid UUID).
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
