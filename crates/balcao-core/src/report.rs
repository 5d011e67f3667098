//! # Reporting Aggregator
//!
//! Read-only rollups over caller-supplied windows of already-fetched
//! rows. No stored state, no caching: every call recomputes from the
//! raw slices. Each report follows the same shape - filter by date
//! range, group by a dimension, sum and count.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::session::{register_totals, RegisterTotals};
use crate::types::{CashMovement, CashSession, MovementKind, Receivable};

/// Grouping label used when a sale carries no payment method.
pub const UNSPECIFIED_PAYMENT_METHOD: &str = "Não informado";

// =============================================================================
// Movement Breakdown
// =============================================================================

/// Sum and count of one movement kind within a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindBreakdown {
    pub kind: MovementKind,
    pub total: Money,
    pub count: usize,
}

/// Groups movements by kind, in ledger order of kinds
/// (opening, sale, withdrawal, supplement, closing).
pub fn movement_breakdown(movements: &[CashMovement]) -> Vec<KindBreakdown> {
    const KINDS: [MovementKind; 5] = [
        MovementKind::Opening,
        MovementKind::Sale,
        MovementKind::Withdrawal,
        MovementKind::Supplement,
        MovementKind::Closing,
    ];

    KINDS
        .iter()
        .map(|&kind| {
            let matching = movements.iter().filter(|m| m.kind == kind);
            KindBreakdown {
                kind,
                total: matching.clone().map(CashMovement::amount).sum(),
                count: matching.count(),
            }
        })
        .collect()
}

// =============================================================================
// Sales by Payment Method
// =============================================================================

/// Sales grouped by payment method, descending by amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodTotal {
    pub method: String,
    pub total: Money,
    pub count: usize,
}

/// Groups sale movements by their free-text payment method.
///
/// Sales without a method fall under [`UNSPECIFIED_PAYMENT_METHOD`].
/// Only `kind = sale` entries participate; sangrias and suprimentos
/// are register flows, not revenue.
pub fn sales_by_payment_method(movements: &[CashMovement]) -> Vec<PaymentMethodTotal> {
    let mut totals: Vec<PaymentMethodTotal> = Vec::new();

    for movement in movements.iter().filter(|m| m.kind == MovementKind::Sale) {
        let method = movement
            .payment_method
            .as_deref()
            .unwrap_or(UNSPECIFIED_PAYMENT_METHOD);

        match totals.iter_mut().find(|t| t.method == method) {
            Some(entry) => {
                entry.total += movement.amount();
                entry.count += 1;
            }
            None => totals.push(PaymentMethodTotal {
                method: method.to_string(),
                total: movement.amount(),
                count: 1,
            }),
        }
    }

    totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.method.cmp(&b.method)));
    totals
}

// =============================================================================
// Receivables Summary
// =============================================================================

/// Aging buckets for a set of receivables.
///
/// `overdue` is carved out of pending by the derived due-date check -
/// a receivable is counted in exactly one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivablesSummary {
    /// Pending and not yet due.
    pub pending: Money,
    pub pending_count: usize,
    /// Pending with due_date < today ("Atrasado" - derived, not stored).
    pub overdue: Money,
    pub overdue_count: usize,
    /// Settled; totals reflect amounts actually collected.
    pub received: Money,
    pub received_count: usize,
}

/// Buckets receivables into pending / overdue / received as of `today`.
pub fn receivables_summary(receivables: &[Receivable], today: NaiveDate) -> ReceivablesSummary {
    let mut summary = ReceivablesSummary {
        pending: Money::zero(),
        pending_count: 0,
        overdue: Money::zero(),
        overdue_count: 0,
        received: Money::zero(),
        received_count: 0,
    };

    for r in receivables {
        if r.is_overdue(today) {
            summary.overdue += r.value();
            summary.overdue_count += 1;
        } else if r.status == crate::types::ReceivableStatus::Pending {
            summary.pending += r.value();
            summary.pending_count += 1;
        } else {
            summary.received += r.value();
            summary.received_count += 1;
        }
    }

    summary
}

/// Outstanding amounts grouped by customer, descending by total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerTotal {
    pub customer: String,
    pub total: Money,
    pub count: usize,
}

/// Groups pending receivables by customer (who owes how much).
///
/// Received items are excluded: their balance is already collected.
pub fn receivables_by_customer(receivables: &[Receivable]) -> Vec<CustomerTotal> {
    let mut totals: Vec<CustomerTotal> = Vec::new();

    for r in receivables
        .iter()
        .filter(|r| r.status == crate::types::ReceivableStatus::Pending)
    {
        match totals.iter_mut().find(|t| t.customer == r.customer) {
            Some(entry) => {
                entry.total += r.value();
                entry.count += 1;
            }
            None => totals.push(CustomerTotal {
                customer: r.customer.clone(),
                total: r.value(),
                count: 1,
            }),
        }
    }

    totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.customer.cmp(&b.customer)));
    totals
}

// =============================================================================
// Session Digest
// =============================================================================

/// One register-day rollup: derived totals plus the recorded closing
/// figures (when the session has closed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDigest {
    pub session_id: String,
    pub date: NaiveDate,
    pub operator: String,
    pub totals: RegisterTotals,
    /// Derived from the ledger at read time.
    pub expected: Money,
    /// Stored at close; `None` while the session is open.
    pub counted: Option<Money>,
    pub difference: Option<Money>,
}

/// Builds the digest for one session and its movements.
pub fn session_digest(session: &CashSession, movements: &[CashMovement]) -> SessionDigest {
    let totals = register_totals(session.opening(), movements);
    SessionDigest {
        session_id: session.id.clone(),
        date: session.session_date,
        operator: session.operator.clone(),
        expected: totals.expected(),
        totals,
        counted: session.closing_cents.map(Money::from_cents),
        difference: session.difference(),
    }
}

// =============================================================================
// Date-Range Filters
// =============================================================================

/// Movements whose creation date falls within `[from, to]` (inclusive).
pub fn movements_between<'a>(
    movements: &'a [CashMovement],
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<&'a CashMovement> {
    movements
        .iter()
        .filter(|m| {
            let date = m.created_at.date_naive();
            date >= from && date <= to
        })
        .collect()
}

/// Receivables whose due date falls within `[from, to]` (inclusive).
pub fn receivables_due_between<'a>(
    receivables: &'a [Receivable],
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<&'a Receivable> {
    receivables
        .iter()
        .filter(|r| r.due_date >= from && r.due_date <= to)
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ReceivableStatus, SessionStatus};
    use chrono::{TimeZone, Utc};

    fn movement(kind: MovementKind, cents: i64, method: Option<&str>) -> CashMovement {
        CashMovement {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: "s1".to_string(),
            kind,
            amount_cents: cents,
            description: None,
            payment_method: method.map(str::to_string),
            created_at: Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap(),
        }
    }

    fn receivable(cents: i64, due: NaiveDate, status: ReceivableStatus) -> Receivable {
        Receivable {
            id: uuid::Uuid::new_v4().to_string(),
            description: "Parcela".to_string(),
            customer: "Maria Oliveira".to_string(),
            value_cents: cents,
            due_date: due,
            status,
            original_cents: None,
            discount_cents: None,
            addition_cents: None,
            payment_date: None,
            payment_method: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_movement_breakdown() {
        let movements = vec![
            movement(MovementKind::Opening, 10_000, None),
            movement(MovementKind::Sale, 5_000, Some("Dinheiro")),
            movement(MovementKind::Sale, 2_000, Some("Pix")),
            movement(MovementKind::Withdrawal, 3_000, None),
        ];

        let breakdown = movement_breakdown(&movements);
        assert_eq!(breakdown.len(), 5);

        let sales = breakdown
            .iter()
            .find(|b| b.kind == MovementKind::Sale)
            .unwrap();
        assert_eq!(sales.total.cents(), 7_000);
        assert_eq!(sales.count, 2);

        let closing = breakdown
            .iter()
            .find(|b| b.kind == MovementKind::Closing)
            .unwrap();
        assert_eq!(closing.count, 0);
        assert_eq!(closing.total, Money::zero());
    }

    #[test]
    fn test_sales_by_payment_method() {
        let movements = vec![
            movement(MovementKind::Sale, 5_000, Some("Dinheiro")),
            movement(MovementKind::Sale, 2_000, Some("Pix")),
            movement(MovementKind::Sale, 4_000, Some("Pix")),
            movement(MovementKind::Sale, 1_000, None),
            // Non-sale flows never count as revenue
            movement(MovementKind::Supplement, 9_000, None),
        ];

        let totals = sales_by_payment_method(&movements);
        assert_eq!(totals.len(), 3);

        // Descending by amount: Pix 60,00 > Dinheiro 50,00 > unspecified 10,00
        assert_eq!(totals[0].method, "Pix");
        assert_eq!(totals[0].total.cents(), 6_000);
        assert_eq!(totals[0].count, 2);
        assert_eq!(totals[1].method, "Dinheiro");
        assert_eq!(totals[2].method, UNSPECIFIED_PAYMENT_METHOD);
        assert_eq!(totals[2].total.cents(), 1_000);
    }

    #[test]
    fn test_receivables_summary_buckets_are_disjoint() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let past = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let future = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();

        let rows = vec![
            receivable(10_000, future, ReceivableStatus::Pending),
            receivable(20_000, past, ReceivableStatus::Pending), // overdue
            receivable(30_000, past, ReceivableStatus::Received), // settled, not overdue
        ];

        let summary = receivables_summary(&rows, today);
        assert_eq!(summary.pending.cents(), 10_000);
        assert_eq!(summary.pending_count, 1);
        assert_eq!(summary.overdue.cents(), 20_000);
        assert_eq!(summary.overdue_count, 1);
        assert_eq!(summary.received.cents(), 30_000);
        assert_eq!(summary.received_count, 1);
    }

    #[test]
    fn test_receivables_by_customer() {
        let due = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let mut rows = vec![
            receivable(10_000, due, ReceivableStatus::Pending),
            receivable(25_000, due, ReceivableStatus::Pending),
            receivable(99_000, due, ReceivableStatus::Received),
        ];
        rows[1].customer = "Construtora Alfa".to_string();
        rows[2].customer = "Construtora Alfa".to_string();

        let totals = receivables_by_customer(&rows);
        assert_eq!(totals.len(), 2);

        // Descending by outstanding total; settled rows excluded
        assert_eq!(totals[0].customer, "Construtora Alfa");
        assert_eq!(totals[0].total.cents(), 25_000);
        assert_eq!(totals[0].count, 1);
        assert_eq!(totals[1].customer, "Maria Oliveira");
        assert_eq!(totals[1].total.cents(), 10_000);
    }

    #[test]
    fn test_session_digest() {
        let session = CashSession {
            id: "s1".to_string(),
            session_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            status: SessionStatus::Open,
            opening_cents: 10_000,
            closing_cents: None,
            expected_cents: None,
            difference_cents: None,
            operator: "Operador".to_string(),
            notes: None,
            opened_at: Utc::now(),
            closed_at: None,
        };
        let movements = vec![
            movement(MovementKind::Sale, 5_000, Some("Dinheiro")),
            movement(MovementKind::Withdrawal, 3_000, None),
            movement(MovementKind::Supplement, 2_000, None),
        ];

        let digest = session_digest(&session, &movements);
        assert_eq!(digest.expected.cents(), 14_000);
        assert_eq!(digest.counted, None);
        assert_eq!(digest.difference, None);
    }

    #[test]
    fn test_movements_between() {
        let movements = vec![movement(MovementKind::Sale, 5_000, None)];

        let jan = movements_between(
            &movements,
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        );
        assert_eq!(jan.len(), 1);

        let feb = movements_between(
            &movements,
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
        );
        assert!(feb.is_empty());
    }

    #[test]
    fn test_receivables_due_between() {
        let rows = vec![
            receivable(
                10_000,
                NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
                ReceivableStatus::Pending,
            ),
            receivable(
                20_000,
                NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
                ReceivableStatus::Pending,
            ),
        ];

        let window = receivables_due_between(
            &rows,
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        );
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].value_cents, 10_000);
    }
}
