//! # balcao-db: Record Store for Balcão POS
//!
//! This crate provides database access for the Balcão POS domain:
//! cash sessions, their movement ledger, and receivables. It uses
//! SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Balcão POS Data Flow                           │
//! │                                                                     │
//! │  Embedding application (open register, settle receivables, ...)     │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                  balcao-db (THIS CRATE)                     │   │
//! │  │                                                             │   │
//! │  │   ┌─────────────┐   ┌───────────────┐   ┌──────────────┐   │   │
//! │  │   │  Database   │   │ Repositories  │   │  Migrations  │   │   │
//! │  │   │  (pool.rs)  │◄──│ session.rs    │   │  (embedded)  │   │   │
//! │  │   │             │   │ receivable.rs │   │ 001_init.sql │   │   │
//! │  │   └─────────────┘   └───────────────┘   └──────────────┘   │   │
//! │  │                                                             │   │
//! │  │   Storage-boundary invariants enforced here:                │   │
//! │  │   • single open session  (partial unique index)             │   │
//! │  │   • atomic open          (session + opening entry, one tx)  │   │
//! │  │   • terminal close       (guarded UPDATE on status)         │   │
//! │  │   • settlement CAS       (status-guarded UPDATE)            │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite Database (WAL mode)                                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use balcao_db::{Database, DbConfig};
//! use balcao_core::Money;
//!
//! let db = Database::new(DbConfig::new("path/to/balcao.db")).await?;
//!
//! let session = db
//!     .sessions()
//!     .open_register(Money::from_cents(10_000), "Operador", None)
//!     .await?;
//!
//! let expected = db.sessions().expected_balance(&session.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::receivable::{
    NewReceivable, ReceivableFilter, ReceivableRepository, SettlementOutcome, SettlementRequest,
};
pub use repository::session::CashSessionRepository;
