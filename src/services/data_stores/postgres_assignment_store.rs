use color_eyre::eyre::eyre;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::domain::{
    AssignmentStore, AssignmentStoreError, Headcount, ShiftId, StaffId,
};

/// Postgres-backed assignment ledger. Mutations take a row lock on the shift
/// row(s) involved before checking preconditions, so the capacity check and
/// the write cannot be interleaved with a concurrent mutation of the same
/// shift. The composite primary key on (shift_id, staff_id) backs the
/// no-duplicate-assignment invariant.
pub struct PostgresAssignmentStore {
    pool: PgPool,
}

impl PostgresAssignmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn lock_shift_row(
    tx: &mut Transaction<'_, Postgres>,
    shift_id: &ShiftId,
) -> Result<(), AssignmentStoreError> {
    sqlx::query("SELECT id FROM shifts WHERE id = $1 FOR UPDATE")
        .bind(shift_id.as_ref())
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| AssignmentStoreError::UnexpectedError(eyre!(e)))?;
    Ok(())
}

async fn count_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    shift_id: &ShiftId,
) -> Result<i64, AssignmentStoreError> {
    let row = sqlx::query(
        "SELECT COUNT(*) AS assigned FROM shift_assignments WHERE shift_id = $1",
    )
    .bind(shift_id.as_ref())
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| AssignmentStoreError::UnexpectedError(eyre!(e)))?;
    row.try_get("assigned")
        .map_err(|e| AssignmentStoreError::UnexpectedError(eyre!(e)))
}

async fn insert_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    staff_id: &StaffId,
    shift_id: &ShiftId,
    required_headcount: Headcount,
) -> Result<(), AssignmentStoreError> {
    let assigned = count_in_tx(tx, shift_id).await?;
    if assigned >= i64::from(required_headcount.value_of()) {
        return Err(AssignmentStoreError::ShiftFull);
    }

    sqlx::query(
        "INSERT INTO shift_assignments (shift_id, staff_id) VALUES ($1, $2)",
    )
    .bind(shift_id.as_ref())
    .bind(staff_id.as_ref())
    .execute(&mut **tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AssignmentStoreError::AlreadyAssigned
        }
        e => AssignmentStoreError::UnexpectedError(eyre!(e)),
    })?;
    Ok(())
}

async fn delete_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    staff_id: &StaffId,
    shift_id: &ShiftId,
) -> Result<(), AssignmentStoreError> {
    let result = sqlx::query(
        "DELETE FROM shift_assignments WHERE shift_id = $1 AND staff_id = $2",
    )
    .bind(shift_id.as_ref())
    .bind(staff_id.as_ref())
    .execute(&mut **tx)
    .await
    .map_err(|e| AssignmentStoreError::UnexpectedError(eyre!(e)))?;

    if result.rows_affected() == 0 {
        return Err(AssignmentStoreError::AssignmentNotFound);
    }
    Ok(())
}

#[async_trait::async_trait]
impl AssignmentStore for PostgresAssignmentStore {
    #[tracing::instrument(name = "Checking assignment in PostgreSQL", skip_all)]
    async fn is_assigned(
        &self,
        staff_id: &StaffId,
        shift_id: &ShiftId,
    ) -> Result<bool, AssignmentStoreError> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM shift_assignments
                WHERE shift_id = $1 AND staff_id = $2
            ) AS assigned
            "#,
        )
        .bind(shift_id.as_ref())
        .bind(staff_id.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AssignmentStoreError::UnexpectedError(eyre!(e)))?;
        row.try_get("assigned")
            .map_err(|e| AssignmentStoreError::UnexpectedError(eyre!(e)))
    }

    #[tracing::instrument(
        name = "Counting assignments in PostgreSQL",
        skip_all
    )]
    async fn assignment_count(
        &self,
        shift_id: &ShiftId,
    ) -> Result<usize, AssignmentStoreError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS assigned FROM shift_assignments WHERE shift_id = $1",
        )
        .bind(shift_id.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AssignmentStoreError::UnexpectedError(eyre!(e)))?;
        let assigned: i64 = row
            .try_get("assigned")
            .map_err(|e| AssignmentStoreError::UnexpectedError(eyre!(e)))?;
        Ok(assigned as usize)
    }

    #[tracing::instrument(
        name = "Getting shift holders from PostgreSQL",
        skip_all
    )]
    async fn holders(
        &self,
        shift_id: &ShiftId,
    ) -> Result<Vec<StaffId>, AssignmentStoreError> {
        let rows = sqlx::query(
            r#"
            SELECT staff_id FROM shift_assignments
            WHERE shift_id = $1
            ORDER BY staff_id
            "#,
        )
        .bind(shift_id.as_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AssignmentStoreError::UnexpectedError(eyre!(e)))?;

        rows.into_iter()
            .map(|row| {
                let staff_id: Uuid = row.try_get("staff_id").map_err(|e| {
                    AssignmentStoreError::UnexpectedError(eyre!(e))
                })?;
                Ok(StaffId::new(staff_id))
            })
            .collect()
    }

    #[tracing::instrument(name = "Assigning staff in PostgreSQL", skip_all)]
    async fn assign(
        &mut self,
        staff_id: &StaffId,
        shift_id: &ShiftId,
        required_headcount: Headcount,
    ) -> Result<(), AssignmentStoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AssignmentStoreError::UnexpectedError(eyre!(e)))?;

        lock_shift_row(&mut tx, shift_id).await?;
        insert_in_tx(&mut tx, staff_id, shift_id, required_headcount).await?;

        tx.commit()
            .await
            .map_err(|e| AssignmentStoreError::UnexpectedError(eyre!(e)))?;
        Ok(())
    }

    #[tracing::instrument(name = "Unassigning staff in PostgreSQL", skip_all)]
    async fn unassign(
        &mut self,
        staff_id: &StaffId,
        shift_id: &ShiftId,
    ) -> Result<(), AssignmentStoreError> {
        let result = sqlx::query(
            "DELETE FROM shift_assignments WHERE shift_id = $1 AND staff_id = $2",
        )
        .bind(shift_id.as_ref())
        .bind(staff_id.as_ref())
        .execute(&self.pool)
        .await
        .map_err(|e| AssignmentStoreError::UnexpectedError(eyre!(e)))?;

        if result.rows_affected() == 0 {
            return Err(AssignmentStoreError::AssignmentNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Swapping assignments in PostgreSQL", skip_all)]
    async fn swap_assignments(
        &mut self,
        requester_id: &StaffId,
        offered_shift_id: &ShiftId,
        counterparty_id: &StaffId,
        target_shift_id: &ShiftId,
        offered_headcount: Headcount,
        target_headcount: Headcount,
    ) -> Result<(), AssignmentStoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AssignmentStoreError::UnexpectedError(eyre!(e)))?;

        // lock both shift rows in a stable order to avoid deadlocking with
        // a concurrent swap of the same pair
        let mut shift_ids = [offered_shift_id, target_shift_id];
        shift_ids.sort();
        for shift_id in shift_ids {
            lock_shift_row(&mut tx, shift_id).await?;
        }

        // both parties vacate before either takes their new slot; a failure
        // on any step aborts the transaction, leaving no partial exchange
        delete_in_tx(&mut tx, requester_id, offered_shift_id).await?;
        delete_in_tx(&mut tx, counterparty_id, target_shift_id).await?;
        insert_in_tx(&mut tx, requester_id, target_shift_id, target_headcount)
            .await?;
        insert_in_tx(
            &mut tx,
            counterparty_id,
            offered_shift_id,
            offered_headcount,
        )
        .await?;

        tx.commit()
            .await
            .map_err(|e| AssignmentStoreError::UnexpectedError(eyre!(e)))?;
        Ok(())
    }
}
