//! # balcao-core: Pure Business Logic for Balcão POS
//!
//! This crate is the domain heart of Balcão POS: the cash-session
//! (caixa) state machine arithmetic, the receivables settlement engine,
//! and the reporting aggregator, all as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Balcão POS Architecture                         │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                 Embedding application                       │   │
//! │  │   open register ─► record movements ─► close ─► settle      │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │              ★ balcao-core (THIS CRATE) ★                   │   │
//! │  │                                                             │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌────────────┐ ┌────────┐         │   │
//! │  │  │  types  │ │  money  │ │ settlement │ │ report │         │   │
//! │  │  │ Session │ │ centavo │ │   baixa    │ │ rollup │         │   │
//! │  │  │ Movement│ │  math   │ │  engine    │ │  fns   │         │   │
//! │  │  └─────────┘ └─────────┘ └────────────┘ └────────┘         │   │
//! │  │                                                             │   │
//! │  │  NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                balcao-db (Record Store)                     │   │
//! │  │     SQLite repositories, transactions, CAS transitions      │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CashSession, CashMovement, Receivable)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`session`] - Register totals, expected balance, reconciliation
//! - [`settlement`] - Receivables settlement ("baixa") calculations
//! - [`report`] - Pure reporting rollups over fetched rows
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: deterministic - same input, same output; even
//!    the clock is an input (callers pass timestamps and "today" in)
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are centavos (i64); sums
//!    never touch floating point
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use balcao_core::money::Money;
//! use balcao_core::session::{reconcile, CashCheck};
//!
//! // Derived balance vs. physically counted cash at closing
//! let rec = reconcile(Money::from_cents(14_000), Money::from_cents(13_500));
//!
//! assert_eq!(rec.difference.cents(), -500);
//! assert_eq!(rec.check(), CashCheck::Shortage);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod report;
pub mod session;
pub mod settlement;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a movement or receivable description.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Maximum length of the operator identity string.
pub const MAX_OPERATOR_LEN: usize = 100;

/// Maximum length of a receivable's customer name.
pub const MAX_CUSTOMER_LEN: usize = 120;
