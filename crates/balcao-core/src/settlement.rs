//! # Settlement Engine
//!
//! Pure calculations for marking receivables as paid ("baixa"), with
//! per-item discounts and a whole-batch display discount.
//!
//! ## Settlement Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Operator selects pending receivables                               │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Per item: finalValue = max(0, value − perItemDiscount)             │
//! │       │         original_value = prior value (audit)                │
//! │       │         status: Pendente → Recebido                         │
//! │       ▼                                                             │
//! │  Batch total shown to the operator:                                 │
//! │       max(0, Σ original − Σ item discounts − general discount)      │
//! │                                                                     │
//! │  The general discount reduces the DISPLAYED total only; persisted   │
//! │  rows carry solely their own per-item discount (matches the         │
//! │  original application's behavior - see DESIGN.md).                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This module is pure: it produces updated copies and totals. Applying
//! them to the store - including the status compare-and-swap that keeps
//! two concurrent settlements from both winning - is `balcao-db`'s job.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Receivable, ReceivableStatus};

// =============================================================================
// Inputs
// =============================================================================

/// One receivable selected for settlement, with its per-item discount.
#[derive(Debug, Clone)]
pub struct SettlementItem {
    pub receivable: Receivable,
    /// Discount granted on this item alone. Zero is common.
    pub discount: Money,
}

// =============================================================================
// Per-Item Settlement
// =============================================================================

/// Computes the settled copy of a single receivable.
///
/// ## Rules
/// - The receivable must still be pending (`AlreadySettled` otherwise -
///   a second settlement is rejected, never re-applied).
/// - `discount` must be ≥ 0 and ≤ the current value.
/// - The result carries: `original_cents` = prior value,
///   `value_cents` = value − discount (clamped at zero),
///   `status` = Received, payment date/method stamped.
///
/// `updated_at` is left untouched; the store stamps it when persisting.
///
/// ## Example
/// ```rust
/// # use balcao_core::settlement::settle_one;
/// # use balcao_core::money::Money;
/// # use balcao_core::types::{Receivable, ReceivableStatus};
/// # use chrono::{NaiveDate, Utc};
/// # let pending = Receivable {
/// #     id: "r1".into(), description: "Venda #10050".into(),
/// #     customer: "João Silva".into(), value_cents: 30_000,
/// #     due_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
/// #     status: ReceivableStatus::Pending, original_cents: None,
/// #     discount_cents: None, addition_cents: None, payment_date: None,
/// #     payment_method: None, created_at: Utc::now(), updated_at: Utc::now(),
/// # };
/// let paid = settle_one(
///     &pending,
///     Money::from_cents(5_000),
///     "Dinheiro",
///     NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
/// )
/// .unwrap();
///
/// assert_eq!(paid.original_cents, Some(30_000));
/// assert_eq!(paid.discount_cents, Some(5_000));
/// assert_eq!(paid.value_cents, 25_000);
/// assert_eq!(paid.status, ReceivableStatus::Received);
/// ```
pub fn settle_one(
    receivable: &Receivable,
    discount: Money,
    payment_method: &str,
    payment_date: NaiveDate,
) -> CoreResult<Receivable> {
    if receivable.status != ReceivableStatus::Pending {
        return Err(CoreError::AlreadySettled {
            receivable_id: receivable.id.clone(),
        });
    }

    if discount.is_negative() {
        return Err(CoreError::InvalidAmount {
            field: "discount",
            cents: discount.cents(),
        });
    }

    if discount > receivable.value() {
        return Err(CoreError::DiscountExceedsValue {
            receivable_id: receivable.id.clone(),
            discount_cents: discount.cents(),
            value_cents: receivable.value_cents,
        });
    }

    let collected = receivable.value().sub_or_zero(discount);

    let mut settled = receivable.clone();
    settled.original_cents = Some(receivable.value_cents);
    settled.discount_cents = Some(discount.cents());
    settled.value_cents = collected.cents();
    settled.status = ReceivableStatus::Received;
    settled.payment_date = Some(payment_date);
    settled.payment_method = Some(payment_method.to_string());

    Ok(settled)
}

// =============================================================================
// Batch Totals (display-level)
// =============================================================================

/// Totals shown to the operator when confirming a batch settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTotals {
    /// Σ of the items' pre-discount values.
    pub original: Money,
    /// Σ of the per-item discounts.
    pub item_discounts: Money,
    /// Whole-batch discount. Display-level only, never persisted to rows.
    pub general_discount: Money,
    /// max(0, original − item_discounts − general_discount).
    pub total_due: Money,
}

/// Computes the batch display totals.
///
/// The general discount reduces the sum the operator sees; it is not
/// distributed back into individual rows. The total is clamped at zero,
/// as the original register does.
pub fn batch_totals(items: &[SettlementItem], general_discount: Money) -> CoreResult<BatchTotals> {
    if general_discount.is_negative() {
        return Err(CoreError::InvalidAmount {
            field: "general_discount",
            cents: general_discount.cents(),
        });
    }

    let original: Money = items.iter().map(|i| i.receivable.value()).sum();
    let item_discounts: Money = items.iter().map(|i| i.discount).sum();

    Ok(BatchTotals {
        original,
        item_discounts,
        general_discount,
        total_due: original.sub_or_zero(item_discounts).sub_or_zero(general_discount),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn pending(id: &str, cents: i64) -> Receivable {
        Receivable {
            id: id.to_string(),
            description: format!("Venda #{id}"),
            customer: "Construtora Alfa".to_string(),
            value_cents: cents,
            due_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            status: ReceivableStatus::Pending,
            original_cents: None,
            discount_cents: None,
            addition_cents: None,
            payment_date: None,
            payment_method: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn pay_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 20).unwrap()
    }

    #[test]
    fn test_settle_arithmetic() {
        // value=300,00, discount=50,00 → original=300,00, value=250,00
        let r = pending("r1", 30_000);
        let settled = settle_one(&r, Money::from_cents(5_000), "Pix", pay_date()).unwrap();

        assert_eq!(settled.original_cents, Some(30_000));
        assert_eq!(settled.discount_cents, Some(5_000));
        assert_eq!(settled.value_cents, 25_000);
        assert_eq!(settled.status, ReceivableStatus::Received);
        assert_eq!(settled.payment_date, Some(pay_date()));
        assert_eq!(settled.payment_method.as_deref(), Some("Pix"));
    }

    #[test]
    fn test_settle_zero_discount() {
        let r = pending("r1", 30_000);
        let settled = settle_one(&r, Money::zero(), "Dinheiro", pay_date()).unwrap();

        assert_eq!(settled.value_cents, 30_000);
        assert_eq!(settled.original_cents, Some(30_000));
        assert_eq!(settled.discount_cents, Some(0));
    }

    #[test]
    fn test_settle_already_settled_is_rejected() {
        let r = pending("r1", 30_000);
        let settled = settle_one(&r, Money::zero(), "Dinheiro", pay_date()).unwrap();

        // Second settlement must be rejected and change nothing.
        let err = settle_one(&settled, Money::from_cents(100), "Dinheiro", pay_date());
        assert!(matches!(err, Err(CoreError::AlreadySettled { .. })));
        assert_eq!(settled.value_cents, 30_000);
    }

    #[test]
    fn test_settle_rejects_bad_discounts() {
        let r = pending("r1", 30_000);

        let err = settle_one(&r, Money::from_cents(-1), "Dinheiro", pay_date());
        assert!(matches!(err, Err(CoreError::InvalidAmount { .. })));

        let err = settle_one(&r, Money::from_cents(30_001), "Dinheiro", pay_date());
        assert!(matches!(err, Err(CoreError::DiscountExceedsValue { .. })));

        // Full discount is allowed (value collapses to zero)
        let settled = settle_one(&r, Money::from_cents(30_000), "Dinheiro", pay_date()).unwrap();
        assert_eq!(settled.value_cents, 0);
    }

    #[test]
    fn test_batch_totals_general_discount_display_only() {
        let items = vec![
            SettlementItem {
                receivable: pending("r1", 30_000),
                discount: Money::from_cents(5_000),
            },
            SettlementItem {
                receivable: pending("r2", 20_000),
                discount: Money::zero(),
            },
        ];

        let totals = batch_totals(&items, Money::from_cents(2_500)).unwrap();
        assert_eq!(totals.original.cents(), 50_000);
        assert_eq!(totals.item_discounts.cents(), 5_000);
        assert_eq!(totals.general_discount.cents(), 2_500);
        assert_eq!(totals.total_due.cents(), 42_500);

        // The general discount never leaks into the per-item results.
        let settled = settle_one(
            &items[0].receivable,
            items[0].discount,
            "Dinheiro",
            pay_date(),
        )
        .unwrap();
        assert_eq!(settled.value_cents, 25_000); // only the item's own discount
    }

    #[test]
    fn test_batch_totals_clamped_at_zero() {
        let items = vec![SettlementItem {
            receivable: pending("r1", 10_000),
            discount: Money::from_cents(10_000),
        }];

        let totals = batch_totals(&items, Money::from_cents(99_999)).unwrap();
        assert_eq!(totals.total_due, Money::zero());
    }

    #[test]
    fn test_batch_totals_rejects_negative_general_discount() {
        let err = batch_totals(&[], Money::from_cents(-1));
        assert!(matches!(err, Err(CoreError::InvalidAmount { .. })));
    }
}
