use chrono::{DateTime, Utc};
use color_eyre::eyre::eyre;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::{
    Headcount, Shift, ShiftId, ShiftRole, ShiftStore, ShiftStoreError,
    VenueId,
};

pub struct PostgresShiftStore {
    pool: PgPool,
}

impl PostgresShiftStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ShiftStore for PostgresShiftStore {
    #[tracing::instrument(name = "Adding shift to PostgreSQL", skip_all)]
    async fn add_shift(
        &mut self,
        shift: Shift,
    ) -> Result<(), ShiftStoreError> {
        sqlx::query(
            r#"
            INSERT INTO shifts
                (id, venue_id, role, start_time, end_time, required_headcount)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(shift.id.as_ref())
        .bind(shift.venue_id.as_ref())
        .bind(shift.role.as_ref())
        .bind(shift.start_time)
        .bind(shift.end_time)
        .bind(shift.required_headcount.value_of())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ShiftStoreError::ShiftIdExists
            }
            e => ShiftStoreError::UnexpectedError(eyre!(e)),
        })?;
        Ok(())
    }

    #[tracing::instrument(name = "Getting shift from PostgreSQL", skip_all)]
    async fn get_shift(
        &self,
        shift_id: &ShiftId,
    ) -> Result<Shift, ShiftStoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, venue_id, role, start_time, end_time,
                   required_headcount
            FROM shifts
            WHERE id = $1
            "#,
        )
        .bind(shift_id.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => ShiftStoreError::ShiftNotFound,
            e => ShiftStoreError::UnexpectedError(eyre!(e)),
        })?;

        let role: String = row
            .try_get("role")
            .map_err(|e| ShiftStoreError::UnexpectedError(eyre!(e)))?;
        let required_headcount: i16 = row
            .try_get("required_headcount")
            .map_err(|e| ShiftStoreError::UnexpectedError(eyre!(e)))?;

        Ok(Shift {
            id: ShiftId::new(
                row.try_get::<Uuid, _>("id")
                    .map_err(|e| ShiftStoreError::UnexpectedError(eyre!(e)))?,
            ),
            venue_id: VenueId::new(
                row.try_get::<Uuid, _>("venue_id")
                    .map_err(|e| ShiftStoreError::UnexpectedError(eyre!(e)))?,
            ),
            role: ShiftRole::parse(&role)
                .map_err(|e| ShiftStoreError::UnexpectedError(eyre!(e)))?,
            start_time: row
                .try_get::<DateTime<Utc>, _>("start_time")
                .map_err(|e| ShiftStoreError::UnexpectedError(eyre!(e)))?,
            end_time: row
                .try_get::<DateTime<Utc>, _>("end_time")
                .map_err(|e| ShiftStoreError::UnexpectedError(eyre!(e)))?,
            required_headcount: Headcount::parse(required_headcount)
                .map_err(|e| ShiftStoreError::UnexpectedError(eyre!(e)))?,
        })
    }

    #[tracing::instrument(
        name = "Getting required headcount from PostgreSQL",
        skip_all
    )]
    async fn required_headcount(
        &self,
        shift_id: &ShiftId,
    ) -> Result<Headcount, ShiftStoreError> {
        let row = sqlx::query(
            r#"
            SELECT required_headcount FROM shifts WHERE id = $1
            "#,
        )
        .bind(shift_id.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => ShiftStoreError::ShiftNotFound,
            e => ShiftStoreError::UnexpectedError(eyre!(e)),
        })?;

        let required_headcount: i16 = row
            .try_get("required_headcount")
            .map_err(|e| ShiftStoreError::UnexpectedError(eyre!(e)))?;
        Headcount::parse(required_headcount)
            .map_err(|e| ShiftStoreError::UnexpectedError(eyre!(e)))
    }
}
