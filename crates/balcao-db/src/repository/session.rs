//! # Cash Session Repository
//!
//! Database operations for cash sessions and their movement ledger.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Cash Session Lifecycle                          │
//! │                                                                     │
//! │  1. OPEN REGISTER                                                   │
//! │     └── open_register() → session row + opening movement,           │
//! │         one transaction: both land or neither does                  │
//! │                                                                     │
//! │  2. RECORD MOVEMENTS (while open)                                   │
//! │     └── record_movement() → sale | withdrawal | supplement          │
//! │         (totals are derived on read, never cached on the row)       │
//! │                                                                     │
//! │  3. CLOSE REGISTER (terminal)                                       │
//! │     └── close_register() → expected balance computed from the       │
//! │         ledger, difference = counted − expected, closing movement   │
//! │         appended; guarded UPDATE keeps concurrent closers to        │
//! │         exactly one winner                                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The "at most one open session" invariant lives in the schema: a
//! partial unique index on `status = 'open'` makes a second open fail
//! with a uniqueness violation, surfaced as `Conflict`.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use balcao_core::session::{closing_description, reconcile, register_totals};
use balcao_core::{
    validation, CashMovement, CashSession, CoreError, Money, MovementKind, SessionStatus,
};

const SESSION_COLUMNS: &str = "id, session_date, status, opening_cents, closing_cents, \
     expected_cents, difference_cents, operator, notes, opened_at, closed_at";

const MOVEMENT_COLUMNS: &str =
    "id, session_id, kind, amount_cents, description, payment_method, created_at";

/// Repository for cash session database operations.
#[derive(Debug, Clone)]
pub struct CashSessionRepository {
    pool: SqlitePool,
}

impl CashSessionRepository {
    /// Creates a new CashSessionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CashSessionRepository { pool }
    }

    // =========================================================================
    // Open
    // =========================================================================

    /// Opens the register: creates a session and its opening movement.
    ///
    /// ## Atomicity
    /// Session row and opening ledger entry are written in one
    /// transaction; a failure of either write rolls back both - no
    /// session without its opening entry, no orphan entry.
    ///
    /// ## Failure
    /// - `Conflict` if another session is already open (partial unique
    ///   index on the status column)
    /// - `Domain(Validation)` for a negative opening float or an empty
    ///   operator
    pub async fn open_register(
        &self,
        opening: Money,
        operator: &str,
        notes: Option<&str>,
    ) -> StoreResult<CashSession> {
        validation::validate_opening_cents(opening.cents()).map_err(CoreError::from)?;
        validation::validate_operator(operator).map_err(CoreError::from)?;

        let now = Utc::now();
        let session = CashSession {
            id: Uuid::new_v4().to_string(),
            session_date: now.date_naive(),
            status: SessionStatus::Open,
            opening_cents: opening.cents(),
            closing_cents: None,
            expected_cents: None,
            difference_cents: None,
            operator: operator.trim().to_string(),
            notes: notes.map(str::to_string),
            opened_at: now,
            closed_at: None,
        };

        debug!(id = %session.id, opening = %opening, "Opening cash register");

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO cash_sessions (
                id, session_date, status, opening_cents,
                closing_cents, expected_cents, difference_cents,
                operator, notes, opened_at, closed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&session.id)
        .bind(session.session_date)
        .bind(session.status)
        .bind(session.opening_cents)
        .bind(session.closing_cents)
        .bind(session.expected_cents)
        .bind(session.difference_cents)
        .bind(&session.operator)
        .bind(&session.notes)
        .bind(session.opened_at)
        .bind(session.closed_at)
        .execute(&mut *tx)
        .await;

        if let Err(err) = inserted {
            let store_err = StoreError::from(err);
            return Err(match store_err {
                StoreError::Conflict(_) => {
                    StoreError::conflict("another cash session is already open")
                }
                other => other,
            });
        }

        let opening_movement = CashMovement {
            id: Uuid::new_v4().to_string(),
            session_id: session.id.clone(),
            kind: MovementKind::Opening,
            amount_cents: opening.cents(),
            description: Some(MovementKind::Opening.default_description().to_string()),
            payment_method: None,
            created_at: now,
        };
        insert_movement(&mut tx, &opening_movement).await?;

        tx.commit().await?;

        info!(
            session_id = %session.id,
            operator = %session.operator,
            opening = %opening,
            "Cash register opened"
        );

        Ok(session)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a session by ID.
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<CashSession>> {
        let session = sqlx::query_as::<_, CashSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM cash_sessions WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Gets the currently open session, if any.
    ///
    /// Read-side convenience for "today's register". Mutating calls
    /// always take an explicit session id - never an implicit "current".
    pub async fn current_open(&self) -> StoreResult<Option<CashSession>> {
        let session = sqlx::query_as::<_, CashSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM cash_sessions \
             WHERE status = 'open' ORDER BY opened_at DESC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Lists sessions whose business date falls within `[from, to]`.
    pub async fn list_between(
        &self,
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    ) -> StoreResult<Vec<CashSession>> {
        let sessions = sqlx::query_as::<_, CashSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM cash_sessions \
             WHERE session_date >= ?1 AND session_date <= ?2 \
             ORDER BY session_date, opened_at"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    /// Gets a session's ledger in insertion order (stable audit order).
    pub async fn movements(&self, session_id: &str) -> StoreResult<Vec<CashMovement>> {
        let movements = sqlx::query_as::<_, CashMovement>(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM cash_movements \
             WHERE session_id = ?1 ORDER BY created_at, rowid"
        ))
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Derives the expected balance from the session's ledger:
    /// `opening + Σ sale + Σ supplement − Σ withdrawal`.
    ///
    /// Pure read - nothing is cached on the session row.
    pub async fn expected_balance(&self, session_id: &str) -> StoreResult<Money> {
        let session = self
            .get_by_id(session_id)
            .await?
            .ok_or_else(|| StoreError::not_found("cash session", session_id))?;

        let movements = self.movements(session_id).await?;
        Ok(register_totals(session.opening(), &movements).expected())
    }

    // =========================================================================
    // Record Movement
    // =========================================================================

    /// Appends one movement to an open session's ledger.
    ///
    /// ## Rules
    /// - Only sale/withdrawal/supplement may be recorded here; opening
    ///   and closing entries belong to the open/close transitions
    /// - `amount` must be strictly positive
    /// - The session's open status is re-checked inside the write
    ///   transaction, not just at read time
    ///
    /// A missing description falls back to the kind's default label
    /// ("Sangria", "Suprimento", ...).
    pub async fn record_movement(
        &self,
        session_id: &str,
        kind: MovementKind,
        amount: Money,
        description: Option<&str>,
        payment_method: Option<&str>,
    ) -> StoreResult<CashMovement> {
        if !kind.is_recordable() {
            return Err(CoreError::MovementNotRecordable { kind }.into());
        }
        validation::validate_amount_cents(amount.cents()).map_err(CoreError::from)?;
        if let Some(text) = description {
            validation::validate_description(text).map_err(CoreError::from)?;
        }

        let mut tx = self.pool.begin().await?;

        let session = fetch_session(&mut tx, session_id)
            .await?
            .ok_or_else(|| StoreError::not_found("cash session", session_id))?;

        if !session.is_open() {
            return Err(CoreError::SessionNotOpen {
                session_id: session_id.to_string(),
                status: session.status,
            }
            .into());
        }

        let movement = CashMovement {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            kind,
            amount_cents: amount.cents(),
            description: Some(
                description
                    .filter(|text| !text.trim().is_empty())
                    .unwrap_or(kind.default_description())
                    .to_string(),
            ),
            payment_method: payment_method.map(str::to_string),
            created_at: Utc::now(),
        };
        insert_movement(&mut tx, &movement).await?;

        tx.commit().await?;

        debug!(
            session_id = %session_id,
            kind = %kind,
            amount = %amount,
            "Movement recorded"
        );

        Ok(movement)
    }

    // =========================================================================
    // Close
    // =========================================================================

    /// Closes the register: reconciles the counted cash against the
    /// derived balance and seals the session.
    ///
    /// ## What This Does
    /// 1. Computes `expected` from the ledger inside the transaction
    /// 2. `difference = counted − expected`
    /// 3. Guarded `UPDATE ... WHERE status = 'open'` - zero rows after a
    ///    successful pre-check means another writer closed first
    ///    (`Conflict`); a session already closed at the pre-check gets
    ///    `SessionNotOpen`
    /// 4. Appends the closing ledger entry with the difference in its
    ///    description
    ///
    /// The transition is terminal: any later movement or close on the
    /// session is rejected.
    pub async fn close_register(
        &self,
        session_id: &str,
        counted: Money,
    ) -> StoreResult<CashSession> {
        validation::validate_counted_cents(counted.cents()).map_err(CoreError::from)?;

        let mut tx = self.pool.begin().await?;

        let session = fetch_session(&mut tx, session_id)
            .await?
            .ok_or_else(|| StoreError::not_found("cash session", session_id))?;

        if !session.is_open() {
            return Err(CoreError::SessionNotOpen {
                session_id: session_id.to_string(),
                status: session.status,
            }
            .into());
        }

        let movements = sqlx::query_as::<_, CashMovement>(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM cash_movements \
             WHERE session_id = ?1 ORDER BY created_at, rowid"
        ))
        .bind(session_id)
        .fetch_all(&mut *tx)
        .await?;

        let totals = register_totals(session.opening(), &movements);
        let reconciliation = reconcile(totals.expected(), counted);
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE cash_sessions SET
                status = 'closed',
                closing_cents = ?2,
                expected_cents = ?3,
                difference_cents = ?4,
                closed_at = ?5
            WHERE id = ?1 AND status = 'open'
            "#,
        )
        .bind(session_id)
        .bind(counted.cents())
        .bind(reconciliation.expected.cents())
        .bind(reconciliation.difference.cents())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Pre-checked open above, so another writer won the close.
            return Err(StoreError::conflict(format!(
                "cash session {session_id} was closed concurrently"
            )));
        }

        let closing_movement = CashMovement {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            kind: MovementKind::Closing,
            amount_cents: counted.cents(),
            description: Some(closing_description(reconciliation.difference)),
            payment_method: None,
            created_at: now,
        };
        insert_movement(&mut tx, &closing_movement).await?;

        tx.commit().await?;

        info!(
            session_id = %session_id,
            expected = %reconciliation.expected,
            counted = %counted,
            difference = %reconciliation.difference,
            "Cash register closed"
        );

        Ok(CashSession {
            status: SessionStatus::Closed,
            closing_cents: Some(counted.cents()),
            expected_cents: Some(reconciliation.expected.cents()),
            difference_cents: Some(reconciliation.difference.cents()),
            closed_at: Some(now),
            ..session
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

async fn fetch_session(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    session_id: &str,
) -> StoreResult<Option<CashSession>> {
    let session = sqlx::query_as::<_, CashSession>(&format!(
        "SELECT {SESSION_COLUMNS} FROM cash_sessions WHERE id = ?1"
    ))
    .bind(session_id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(session)
}

async fn insert_movement(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    movement: &CashMovement,
) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO cash_movements (
            id, session_id, kind, amount_cents,
            description, payment_method, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&movement.id)
    .bind(&movement.session_id)
    .bind(movement.kind)
    .bind(movement.amount_cents)
    .bind(&movement.description)
    .bind(&movement.payment_method)
    .bind(movement.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn open_default(db: &Database) -> CashSession {
        db.sessions()
            .open_register(Money::from_cents(10_000), "Operador", None)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_open_creates_session_and_opening_movement() {
        let db = test_db().await;
        let session = open_default(&db).await;

        assert_eq!(session.status, SessionStatus::Open);
        assert_eq!(session.opening_cents, 10_000);

        let movements = db.sessions().movements(&session.id).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].kind, MovementKind::Opening);
        assert_eq!(movements[0].amount_cents, 10_000);
        assert_eq!(
            movements[0].description.as_deref(),
            Some("Abertura de caixa")
        );
    }

    #[tokio::test]
    async fn test_expected_balance_derivation() {
        // open(100,00) → sale(50,00) → withdrawal(30,00) → supplement(20,00)
        // expected = 140,00
        let db = test_db().await;
        let session = open_default(&db).await;
        let repo = db.sessions();

        repo.record_movement(
            &session.id,
            MovementKind::Sale,
            Money::from_cents(5_000),
            None,
            Some("Dinheiro"),
        )
        .await
        .unwrap();
        repo.record_movement(
            &session.id,
            MovementKind::Withdrawal,
            Money::from_cents(3_000),
            Some("Depósito bancário"),
            None,
        )
        .await
        .unwrap();
        repo.record_movement(
            &session.id,
            MovementKind::Supplement,
            Money::from_cents(2_000),
            None,
            None,
        )
        .await
        .unwrap();

        let expected = repo.expected_balance(&session.id).await.unwrap();
        assert_eq!(expected.cents(), 14_000);
    }

    #[tokio::test]
    async fn test_close_records_difference_and_closing_movement() {
        let db = test_db().await;
        let session = open_default(&db).await;
        let repo = db.sessions();

        repo.record_movement(
            &session.id,
            MovementKind::Sale,
            Money::from_cents(5_000),
            None,
            None,
        )
        .await
        .unwrap();
        repo.record_movement(
            &session.id,
            MovementKind::Withdrawal,
            Money::from_cents(3_000),
            None,
            None,
        )
        .await
        .unwrap();
        repo.record_movement(
            &session.id,
            MovementKind::Supplement,
            Money::from_cents(2_000),
            None,
            None,
        )
        .await
        .unwrap();

        // expected = 140,00; counted = 135,00 → difference = -5,00
        let closed = repo
            .close_register(&session.id, Money::from_cents(13_500))
            .await
            .unwrap();

        assert_eq!(closed.status, SessionStatus::Closed);
        assert_eq!(closed.expected_cents, Some(14_000));
        assert_eq!(closed.closing_cents, Some(13_500));
        assert_eq!(closed.difference_cents, Some(-500));
        assert!(closed.closed_at.is_some());

        // Persisted row matches the returned struct
        let stored = repo.get_by_id(&session.id).await.unwrap().unwrap();
        assert_eq!(stored.status, SessionStatus::Closed);
        assert_eq!(stored.difference_cents, Some(-500));

        // Closing ledger entry carries the difference in its description
        let movements = repo.movements(&session.id).await.unwrap();
        let closing = movements.last().unwrap();
        assert_eq!(closing.kind, MovementKind::Closing);
        assert_eq!(closing.amount_cents, 13_500);
        assert_eq!(
            closing.description.as_deref(),
            Some("Fechamento - Diferença: -R$ 5,00")
        );
    }

    #[tokio::test]
    async fn test_close_is_terminal() {
        let db = test_db().await;
        let session = open_default(&db).await;
        let repo = db.sessions();

        repo.close_register(&session.id, Money::from_cents(10_000))
            .await
            .unwrap();

        // Any further movement is rejected
        let err = repo
            .record_movement(
                &session.id,
                MovementKind::Sale,
                Money::from_cents(1_000),
                None,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(CoreError::SessionNotOpen { .. })
        ));

        // And so is a second close
        let err = repo
            .close_register(&session.id, Money::from_cents(10_000))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(CoreError::SessionNotOpen { .. })
        ));
    }

    #[tokio::test]
    async fn test_second_open_conflicts_and_leaves_no_orphans() {
        let db = test_db().await;
        let first = open_default(&db).await;

        let err = db
            .sessions()
            .open_register(Money::from_cents(500), "Operador 2", None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Exactly one session row and one opening movement: the failed
        // open rolled back wholesale.
        let session_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cash_sessions")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(session_count, 1);

        let movement_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cash_movements")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(movement_count, 1);

        let open = db.sessions().current_open().await.unwrap().unwrap();
        assert_eq!(open.id, first.id);
    }

    #[tokio::test]
    async fn test_open_again_after_close() {
        let db = test_db().await;
        let first = open_default(&db).await;
        db.sessions()
            .close_register(&first.id, Money::from_cents(10_000))
            .await
            .unwrap();

        // Closed is terminal, but a new register-day opens a new session
        let second = db
            .sessions()
            .open_register(Money::from_cents(8_000), "Operador", None)
            .await
            .unwrap();
        assert_ne!(second.id, first.id);
        assert_eq!(second.opening_cents, 8_000);
    }

    #[tokio::test]
    async fn test_record_movement_rejections() {
        let db = test_db().await;
        let session = open_default(&db).await;
        let repo = db.sessions();

        // Non-positive amount
        let err = repo
            .record_movement(&session.id, MovementKind::Sale, Money::zero(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(CoreError::Validation(_))
        ));

        // Opening/closing kinds are not recordable
        let err = repo
            .record_movement(
                &session.id,
                MovementKind::Opening,
                Money::from_cents(100),
                None,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(CoreError::MovementNotRecordable { .. })
        ));

        // Unknown session
        let err = repo
            .record_movement(
                "missing-id",
                MovementKind::Sale,
                Money::from_cents(100),
                None,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_movement_default_description() {
        let db = test_db().await;
        let session = open_default(&db).await;
        let repo = db.sessions();

        let sangria = repo
            .record_movement(
                &session.id,
                MovementKind::Withdrawal,
                Money::from_cents(2_000),
                None,
                None,
            )
            .await
            .unwrap();
        assert_eq!(sangria.description.as_deref(), Some("Sangria"));

        let suprimento = repo
            .record_movement(
                &session.id,
                MovementKind::Supplement,
                Money::from_cents(1_000),
                Some("Troco adicional"),
                None,
            )
            .await
            .unwrap();
        assert_eq!(suprimento.description.as_deref(), Some("Troco adicional"));
    }

    #[tokio::test]
    async fn test_movements_are_in_insertion_order() {
        let db = test_db().await;
        let session = open_default(&db).await;
        let repo = db.sessions();

        for cents in [100, 200, 300] {
            repo.record_movement(
                &session.id,
                MovementKind::Sale,
                Money::from_cents(cents),
                None,
                None,
            )
            .await
            .unwrap();
        }

        let movements = repo.movements(&session.id).await.unwrap();
        let amounts: Vec<i64> = movements.iter().map(|m| m.amount_cents).collect();
        assert_eq!(amounts, vec![10_000, 100, 200, 300]);
    }

    #[tokio::test]
    async fn test_list_between() {
        let db = test_db().await;
        let session = open_default(&db).await;

        let today = session.session_date;
        let sessions = db.sessions().list_between(today, today).await.unwrap();
        assert_eq!(sessions.len(), 1);

        let tomorrow = today.succ_opt().unwrap();
        let sessions = db
            .sessions()
            .list_between(tomorrow, tomorrow)
            .await
            .unwrap();
        assert!(sessions.is_empty());
    }
}
