//! # Cash Register Arithmetic
//!
//! Pure read-side computations for a cash session: derived totals,
//! the expected balance, and the closing reconciliation.
//!
//! ## Balance Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  expected = opening + Σ sale + Σ supplement − Σ withdrawal          │
//! │                                                                     │
//! │  open(100,00)                                                       │
//! │       │                                                             │
//! │       ├── sale(50,00)        ──►  +50,00                            │
//! │       ├── withdrawal(30,00)  ──►  −30,00  (sangria)                 │
//! │       └── supplement(20,00)  ──►  +20,00  (suprimento)              │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  expected = 140,00                                                  │
//! │  counted  = 135,00  ──►  difference = −5,00 (shortage)              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The sum is commutative, so concurrent appends during an open session
//! need no ordering guarantees; the ledger is still read in insertion
//! order for stable audit display.
//!
//! Totals are derived on read, never cached on the session row - one
//! source of truth.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{CashMovement, MovementKind};

// =============================================================================
// Register Totals
// =============================================================================

/// Per-kind totals for one session's movement ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterTotals {
    /// Starting float from the session row.
    pub opening: Money,
    /// Σ amount over kind = sale.
    pub sales: Money,
    /// Σ amount over kind = withdrawal (sangrias).
    pub withdrawals: Money,
    /// Σ amount over kind = supplement (suprimentos).
    pub supplements: Money,
}

impl RegisterTotals {
    /// The derived balance: `opening + sales + supplements − withdrawals`.
    ///
    /// ## Example
    /// ```rust
    /// use balcao_core::money::Money;
    /// use balcao_core::session::RegisterTotals;
    ///
    /// let totals = RegisterTotals {
    ///     opening: Money::from_cents(10_000),
    ///     sales: Money::from_cents(5_000),
    ///     withdrawals: Money::from_cents(3_000),
    ///     supplements: Money::from_cents(2_000),
    /// };
    /// assert_eq!(totals.expected().cents(), 14_000); // R$ 140,00
    /// ```
    #[inline]
    pub fn expected(&self) -> Money {
        self.opening + self.sales + self.supplements - self.withdrawals
    }
}

/// Sums a session's ledger into per-kind totals.
///
/// The opening amount comes from the session row; opening and closing
/// entries in the ledger are balance markers and are ignored here
/// (counting the opening entry as well would double it).
pub fn register_totals(opening: Money, movements: &[CashMovement]) -> RegisterTotals {
    let mut totals = RegisterTotals {
        opening,
        sales: Money::zero(),
        withdrawals: Money::zero(),
        supplements: Money::zero(),
    };

    for movement in movements {
        match movement.kind {
            MovementKind::Sale => totals.sales += movement.amount(),
            MovementKind::Withdrawal => totals.withdrawals += movement.amount(),
            MovementKind::Supplement => totals.supplements += movement.amount(),
            MovementKind::Opening | MovementKind::Closing => {}
        }
    }

    totals
}

// =============================================================================
// Reconciliation
// =============================================================================

/// Presentation label for the reconciliation outcome.
///
/// Purely a display concern: the stored numeric difference is
/// authoritative; nothing branches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashCheck {
    /// counted > expected ("Sobra").
    Surplus,
    /// counted < expected ("Falta").
    Shortage,
    /// counted == expected ("Confere").
    Balanced,
}

/// Result of comparing a physically counted amount against the derived
/// expected balance at closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub expected: Money,
    pub counted: Money,
    /// counted − expected. Negative means shortage.
    pub difference: Money,
}

impl Reconciliation {
    /// Derives the presentation label from the sign of the difference.
    pub fn check(&self) -> CashCheck {
        if self.difference.is_positive() {
            CashCheck::Surplus
        } else if self.difference.is_negative() {
            CashCheck::Shortage
        } else {
            CashCheck::Balanced
        }
    }
}

/// Computes the closing reconciliation.
///
/// ## Example
/// ```rust
/// use balcao_core::money::Money;
/// use balcao_core::session::{reconcile, CashCheck};
///
/// let rec = reconcile(Money::from_cents(14_000), Money::from_cents(13_500));
/// assert_eq!(rec.difference.cents(), -500); // R$ -5,00
/// assert_eq!(rec.check(), CashCheck::Shortage);
/// ```
#[inline]
pub fn reconcile(expected: Money, counted: Money) -> Reconciliation {
    Reconciliation {
        expected,
        counted,
        difference: counted - expected,
    }
}

/// Description written on the closing ledger entry, mirroring the
/// original register ("Fechamento - Diferença: R$ -5,00").
pub fn closing_description(difference: Money) -> String {
    format!("Fechamento - Diferença: {difference}")
}

// =============================================================================
// Unit Tests
// =============================================================================
