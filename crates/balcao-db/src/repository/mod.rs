//! # Repository Module
//!
//! Database repository implementations for Balcão POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                               │
//! │                                                                     │
//! │  Embedding application                                              │
//! │       │                                                             │
//! │       │  db.sessions().close_register(id, counted)                  │
//! │       ▼                                                             │
//! │  CashSessionRepository                                              │
//! │  ├── open_register(opening, operator, notes)                        │
//! │  ├── record_movement(session_id, kind, amount, ...)                 │
//! │  ├── expected_balance(session_id)                                   │
//! │  └── close_register(session_id, counted)                            │
//! │       │                                                             │
//! │       │  SQL (transactions, guarded updates)                        │
//! │       ▼                                                             │
//! │  SQLite Database                                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`session::CashSessionRepository`] - register open/record/close
//! - [`receivable::ReceivableRepository`] - receivables and settlement

pub mod receivable;
pub mod session;
