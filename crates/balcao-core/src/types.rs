//! # Domain Types
//!
//! Core domain types for the cash-session and receivables module.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │  CashSession    │   │  CashMovement   │   │   Receivable    │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  id (UUID)      │◄──│  session_id     │   │  id (UUID)      │   │
//! │  │  status         │   │  kind           │   │  customer       │   │
//! │  │  opening_cents  │   │  amount_cents   │   │  value_cents    │   │
//! │  │  difference     │   │  (append-only)  │   │  due_date       │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘   │
//! │                                                                     │
//! │  SessionStatus: open → closed (terminal)                            │
//! │  MovementKind: opening | sale | withdrawal | supplement | closing   │
//! │  ReceivableStatus: pending → received (one-way)                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Amount Sign Convention
//! `amount_cents` is non-negative everywhere. Direction (cash in vs.
//! cash out) is determined by `MovementKind`, never by a signed amount.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

// =============================================================================
// Session Status
// =============================================================================

/// The lifecycle status of a cash session.
///
/// `Closed` is terminal: a closed session never reopens; a new
/// register-day requires a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Session is accepting movements.
    Open,
    /// Session was reconciled and closed. Terminal.
    Closed,
}

impl SessionStatus {
    /// Stable lowercase name, matching the stored representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Open => "open",
            SessionStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Movement Kind
// =============================================================================

/// The kind of a cash movement (ledger entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Register opened with a starting float. Written once, by the
    /// open transition.
    Opening,
    /// Cash received from a sale.
    Sale,
    /// Cash removed from the register ("sangria", e.g. bank deposit).
    Withdrawal,
    /// Cash added outside of sales ("suprimento", e.g. float top-up).
    Supplement,
    /// Register closed with a counted amount. Written once, by the
    /// close transition.
    Closing,
}

impl MovementKind {
    /// Stable lowercase name, matching the stored representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Opening => "opening",
            MovementKind::Sale => "sale",
            MovementKind::Withdrawal => "withdrawal",
            MovementKind::Supplement => "supplement",
            MovementKind::Closing => "closing",
        }
    }

    /// Whether callers may append this kind while a session is open.
    ///
    /// Opening and closing entries belong to the open/close transitions.
    pub const fn is_recordable(&self) -> bool {
        matches!(
            self,
            MovementKind::Sale | MovementKind::Withdrawal | MovementKind::Supplement
        )
    }

    /// Whether this kind adds cash to the register.
    ///
    /// Opening/closing are balance markers, not flows; only sales and
    /// supplements count as inflow, only withdrawals as outflow.
    pub const fn is_inflow(&self) -> bool {
        matches!(self, MovementKind::Sale | MovementKind::Supplement)
    }

    /// Default pt-BR description, as the original register uses.
    pub const fn default_description(&self) -> &'static str {
        match self {
            MovementKind::Opening => "Abertura de caixa",
            MovementKind::Sale => "Venda",
            MovementKind::Withdrawal => "Sangria",
            MovementKind::Supplement => "Suprimento",
            MovementKind::Closing => "Fechamento",
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Cash Movement (Ledger Entry)
// =============================================================================

/// One atomic cash movement within a session.
///
/// Append-only: once a session moves past open, its movements are never
/// mutated or deleted. `amount_cents` is always ≥ 0; the kind carries
/// the direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CashMovement {
    pub id: String,
    /// Owning cash session.
    pub session_id: String,
    pub kind: MovementKind,
    /// Non-negative amount in centavos.
    pub amount_cents: i64,
    pub description: Option<String>,
    /// Free text ("Dinheiro", "Pix", "Cartão", ...). Present on sales.
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CashMovement {
    /// Returns the amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Cash Session
// =============================================================================

/// One register's open-to-close working period for a given day.
///
/// Totals are never cached on this row: the expected balance is derived
/// from the movement ledger on read. The closing fields
/// (`closing_cents`, `expected_cents`, `difference_cents`, `closed_at`)
/// are all `None` until the close transition and are written together.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CashSession {
    pub id: String,
    /// Business date of the register day.
    pub session_date: NaiveDate,
    pub status: SessionStatus,
    /// Starting float, in centavos (may be zero).
    pub opening_cents: i64,
    /// Physically counted amount at close.
    pub closing_cents: Option<i64>,
    /// Derived balance at the moment of closing.
    pub expected_cents: Option<i64>,
    /// closing − expected. Negative means shortage.
    pub difference_cents: Option<i64>,
    /// Identity of the operator who opened the register.
    pub operator: String,
    pub notes: Option<String>,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl CashSession {
    /// Checks whether the session still accepts movements.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == SessionStatus::Open
    }

    /// Returns the opening float as Money.
    #[inline]
    pub fn opening(&self) -> Money {
        Money::from_cents(self.opening_cents)
    }

    /// Returns the recorded reconciliation difference, if closed.
    #[inline]
    pub fn difference(&self) -> Option<Money> {
        self.difference_cents.map(Money::from_cents)
    }
}

// =============================================================================
// Receivable Status
// =============================================================================

/// The lifecycle status of a receivable.
///
/// Transitions only Pending → Received (one-way). "Overdue" is not a
/// status: it is derived at read time from `due_date` - see
/// [`Receivable::is_overdue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum ReceivableStatus {
    /// Awaiting payment.
    Pending,
    /// Settled. `value_cents` reflects the amount actually collected.
    Received,
}

impl ReceivableStatus {
    /// Stable lowercase name, matching the stored representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReceivableStatus::Pending => "pending",
            ReceivableStatus::Received => "received",
        }
    }
}

impl fmt::Display for ReceivableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Receivable
// =============================================================================

/// An amount owed by a customer, tracked independently of the cash
/// session.
///
/// While pending, `value_cents` is the outstanding amount. After
/// settlement, `value_cents` is the amount actually collected
/// (original − discount, clamped ≥ 0) and `original_cents` preserves
/// the pre-discount amount for history display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Receivable {
    pub id: String,
    pub description: String,
    pub customer: String,
    /// Outstanding (pending) or collected (received) amount, centavos.
    pub value_cents: i64,
    pub due_date: NaiveDate,
    pub status: ReceivableStatus,
    /// Pre-discount value, set only at settlement.
    pub original_cents: Option<i64>,
    /// Per-item discount granted at settlement.
    pub discount_cents: Option<i64>,
    /// Interest/penalty added at settlement (kept for history display).
    pub addition_cents: Option<i64>,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Receivable {
    /// Returns the current value as Money.
    #[inline]
    pub fn value(&self) -> Money {
        Money::from_cents(self.value_cents)
    }

    /// Read-side overdue check ("Atrasado").
    ///
    /// Derived, never stored: a pending receivable whose due date has
    /// passed reports as overdue in any read without requiring a write.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// # use balcao_core::types::{Receivable, ReceivableStatus};
    /// # use chrono::Utc;
    /// # let mut r = Receivable {
    /// #     id: "r1".into(), description: "Venda #10050".into(),
    /// #     customer: "João Silva".into(), value_cents: 15_000,
    /// #     due_date: NaiveDate::from_ymd_opt(2025, 12, 20).unwrap(),
    /// #     status: ReceivableStatus::Pending, original_cents: None,
    /// #     discount_cents: None, addition_cents: None, payment_date: None,
    /// #     payment_method: None, created_at: Utc::now(), updated_at: Utc::now(),
    /// # };
    /// let today = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
    /// assert!(r.is_overdue(today));
    ///
    /// r.status = ReceivableStatus::Received;
    /// assert!(!r.is_overdue(today)); // settled items are never overdue
    /// ```
    #[inline]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == ReceivableStatus::Pending && self.due_date < today
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
