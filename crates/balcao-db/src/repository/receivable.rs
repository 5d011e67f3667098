//! # Receivable Repository
//!
//! Database operations for receivables ("contas a receber") and their
//! settlement ("baixa").
//!
//! ## Settlement Race
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Two operators settle the same receivable                           │
//! │                                                                     │
//! │  Terminal A ──► UPDATE ... WHERE id = r1 AND status = 'pending'     │
//! │                 rows_affected = 1  ──► settled ✓                    │
//! │                                                                     │
//! │  Terminal B ──► UPDATE ... WHERE id = r1 AND status = 'pending'     │
//! │                 rows_affected = 0  ──► Conflict ✗                   │
//! │                                                                     │
//! │  The status column is the compare-and-swap guard: exactly one       │
//! │  writer wins; the discount is never applied twice.                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Batch settlement is deliberately NOT all-or-nothing: items are
//! processed independently and each failure is reported alongside the
//! successes, so the operator can retry just the failed items.

use chrono::{NaiveDate, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use balcao_core::settlement::settle_one;
use balcao_core::{validation, CoreError, Money, Receivable, ReceivableStatus, ValidationError};

const RECEIVABLE_COLUMNS: &str = "id, description, customer, value_cents, due_date, status, \
     original_cents, discount_cents, addition_cents, payment_date, payment_method, \
     created_at, updated_at";

// =============================================================================
// Inputs & Outcomes
// =============================================================================

/// Fields for a new pending receivable (manual entry or bulk import).
#[derive(Debug, Clone)]
pub struct NewReceivable {
    pub description: String,
    pub customer: String,
    pub value: Money,
    pub due_date: NaiveDate,
}

/// Query filter for listing receivables.
///
/// Supports exactly the store's query surface: status equality,
/// customer substring, due-date range, limit/offset.
#[derive(Debug, Clone, Default)]
pub struct ReceivableFilter {
    pub status: Option<ReceivableStatus>,
    pub customer_contains: Option<String>,
    pub due_from: Option<NaiveDate>,
    pub due_to: Option<NaiveDate>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// One receivable selected for settlement, by id, with its discount.
#[derive(Debug, Clone)]
pub struct SettlementRequest {
    pub receivable_id: String,
    pub discount: Money,
}

/// A failed item within a batch settlement.
#[derive(Debug)]
pub struct SettlementFailure {
    pub receivable_id: String,
    pub error: StoreError,
}

/// Partial-success result of a batch settlement.
///
/// Successes are never rolled back because an unrelated item failed.
#[derive(Debug)]
pub struct SettlementOutcome {
    pub settled: Vec<Receivable>,
    pub failed: Vec<SettlementFailure>,
}

impl SettlementOutcome {
    /// True when every requested item settled.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for receivable database operations.
#[derive(Debug, Clone)]
pub struct ReceivableRepository {
    pool: SqlitePool,
}

impl ReceivableRepository {
    /// Creates a new ReceivableRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReceivableRepository { pool }
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Inserts a new pending receivable.
    pub async fn insert(&self, new: &NewReceivable) -> StoreResult<Receivable> {
        let receivable = build_pending(new)?;

        debug!(id = %receivable.id, customer = %receivable.customer, "Inserting receivable");

        insert_row(&self.pool, &receivable).await?;
        Ok(receivable)
    }

    /// Inserts a batch of pending receivables in one transaction.
    ///
    /// Import is all-or-nothing: a bad row aborts the whole batch, so a
    /// re-import never duplicates the rows that got in the first time.
    pub async fn insert_batch(&self, batch: &[NewReceivable]) -> StoreResult<Vec<Receivable>> {
        let mut rows = Vec::with_capacity(batch.len());
        for new in batch {
            rows.push(build_pending(new)?);
        }

        let mut tx = self.pool.begin().await?;
        for receivable in &rows {
            insert_row(&mut *tx, receivable).await?;
        }
        tx.commit().await?;

        info!(count = rows.len(), "Receivable batch imported");
        Ok(rows)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a receivable by ID.
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<Receivable>> {
        let receivable = sqlx::query_as::<_, Receivable>(&format!(
            "SELECT {RECEIVABLE_COLUMNS} FROM receivables WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(receivable)
    }

    /// Lists receivables matching the filter, ordered by due date.
    pub async fn list(&self, filter: &ReceivableFilter) -> StoreResult<Vec<Receivable>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {RECEIVABLE_COLUMNS} FROM receivables WHERE 1 = 1"
        ));

        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(customer) = &filter.customer_contains {
            query
                .push(" AND customer LIKE ")
                .push_bind(format!("%{customer}%"));
        }
        if let Some(from) = filter.due_from {
            query.push(" AND due_date >= ").push_bind(from);
        }
        if let Some(to) = filter.due_to {
            query.push(" AND due_date <= ").push_bind(to);
        }

        query.push(" ORDER BY due_date, rowid");

        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(limit as i64);
            if let Some(offset) = filter.offset {
                query.push(" OFFSET ").push_bind(offset as i64);
            }
        }

        let rows = query
            .build_query_as::<Receivable>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Deletes a receivable. Only pending items may be deleted; the
    /// settlement history of received items is kept.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Receivable>(&format!(
            "SELECT {RECEIVABLE_COLUMNS} FROM receivables WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::not_found("receivable", id))?;

        if existing.status != ReceivableStatus::Pending {
            return Err(CoreError::AlreadySettled {
                receivable_id: id.to_string(),
            }
            .into());
        }

        let result = sqlx::query("DELETE FROM receivables WHERE id = ?1 AND status = 'pending'")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::conflict(format!(
                "receivable {id} was settled concurrently"
            )));
        }

        tx.commit().await?;

        debug!(id = %id, "Receivable deleted");
        Ok(())
    }

    // =========================================================================
    // Settlement
    // =========================================================================

    /// Settles a batch of receivables with per-item discounts.
    ///
    /// ## Partial Success
    /// Items are processed independently: one item's failure never rolls
    /// back another's success. The outcome reports both lists; failures
    /// carry the specific error so the operator can retry just those.
    ///
    /// ## Whole-Batch Discount
    /// Not handled here. An aggregate discount affects only the total
    /// displayed to the operator (`balcao_core::settlement::batch_totals`);
    /// persisted rows carry solely their own per-item discount.
    pub async fn settle(
        &self,
        requests: &[SettlementRequest],
        payment_method: &str,
        payment_date: NaiveDate,
    ) -> StoreResult<SettlementOutcome> {
        let mut outcome = SettlementOutcome {
            settled: Vec::new(),
            failed: Vec::new(),
        };

        for request in requests {
            match self
                .settle_single(request, payment_method, payment_date)
                .await
            {
                Ok(receivable) => outcome.settled.push(receivable),
                Err(error) => {
                    warn!(
                        receivable_id = %request.receivable_id,
                        error = %error,
                        "Settlement failed for receivable"
                    );
                    outcome.failed.push(SettlementFailure {
                        receivable_id: request.receivable_id.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            settled = outcome.settled.len(),
            failed = outcome.failed.len(),
            "Settlement batch finished"
        );

        Ok(outcome)
    }

    /// Settles one receivable: pure calculation in core, then a
    /// compare-and-swap write on the status column.
    async fn settle_single(
        &self,
        request: &SettlementRequest,
        payment_method: &str,
        payment_date: NaiveDate,
    ) -> StoreResult<Receivable> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Receivable>(&format!(
            "SELECT {RECEIVABLE_COLUMNS} FROM receivables WHERE id = ?1"
        ))
        .bind(&request.receivable_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::not_found("receivable", &request.receivable_id))?;

        // Pure settlement math; rejects already-settled and bad discounts
        let mut settled = settle_one(&existing, request.discount, payment_method, payment_date)
            .map_err(StoreError::from)?;
        settled.updated_at = Utc::now();

        // Status is re-validated by the WHERE clause at write time, not
        // merely at read time: exactly one concurrent settler wins.
        let result = sqlx::query(
            r#"
            UPDATE receivables SET
                status = 'received',
                value_cents = ?2,
                original_cents = ?3,
                discount_cents = ?4,
                payment_date = ?5,
                payment_method = ?6,
                updated_at = ?7
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(&request.receivable_id)
        .bind(settled.value_cents)
        .bind(settled.original_cents)
        .bind(settled.discount_cents)
        .bind(settled.payment_date)
        .bind(&settled.payment_method)
        .bind(settled.updated_at)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::conflict(format!(
                "receivable {} was settled concurrently",
                request.receivable_id
            )));
        }

        tx.commit().await?;
        Ok(settled)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn build_pending(new: &NewReceivable) -> StoreResult<Receivable> {
    if new.description.trim().is_empty() {
        return Err(CoreError::from(ValidationError::Required {
            field: "description".to_string(),
        })
        .into());
    }
    validation::validate_description(&new.description).map_err(CoreError::from)?;
    validation::validate_customer(&new.customer).map_err(CoreError::from)?;
    validation::validate_amount_cents(new.value.cents()).map_err(CoreError::from)?;

    let now = Utc::now();
    Ok(Receivable {
        id: Uuid::new_v4().to_string(),
        description: new.description.trim().to_string(),
        customer: new.customer.trim().to_string(),
        value_cents: new.value.cents(),
        due_date: new.due_date,
        status: ReceivableStatus::Pending,
        original_cents: None,
        discount_cents: None,
        addition_cents: None,
        payment_date: None,
        payment_method: None,
        created_at: now,
        updated_at: now,
    })
}

async fn insert_row<'e, E>(executor: E, receivable: &Receivable) -> StoreResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO receivables (
            id, description, customer, value_cents, due_date, status,
            original_cents, discount_cents, addition_cents,
            payment_date, payment_method, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#,
    )
    .bind(&receivable.id)
    .bind(&receivable.description)
    .bind(&receivable.customer)
    .bind(receivable.value_cents)
    .bind(receivable.due_date)
    .bind(receivable.status)
    .bind(receivable.original_cents)
    .bind(receivable.discount_cents)
    .bind(receivable.addition_cents)
    .bind(receivable.payment_date)
    .bind(&receivable.payment_method)
    .bind(receivable.created_at)
    .bind(receivable.updated_at)
    .execute(executor)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
