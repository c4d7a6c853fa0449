use chrono::{DateTime, Utc};
use color_eyre::eyre::{bail, eyre, Result};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row, Transaction};
use uuid::Uuid;

use crate::domain::{
    Decision, RequestFilter, RequestId, RequestKind, Resolution, ShiftId,
    ShiftRequest, ShiftSwap, StaffId, SwapFilter, SwapId, TransferStatus,
    TransferStore, TransferStoreError, VenueId,
};

/// Postgres-backed transfer store. The `pending_transfers` table carries a
/// primary key on (staff_id, venue_id); inserting into it in the same
/// transaction as the request/swap row makes the duplicate-pending check and
/// the insert one atomic step, across both record types.
pub struct PostgresTransferStore {
    pool: PgPool,
}

impl PostgresTransferStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn claim_pending_slot(
    tx: &mut Transaction<'_, Postgres>,
    staff_id: &StaffId,
    venue_id: &VenueId,
) -> Result<(), TransferStoreError> {
    sqlx::query(
        "INSERT INTO pending_transfers (staff_id, venue_id) VALUES ($1, $2)",
    )
    .bind(staff_id.as_ref())
    .bind(venue_id.as_ref())
    .execute(&mut **tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            TransferStoreError::DuplicatePendingTransfer
        }
        e => TransferStoreError::UnexpectedError(eyre!(e)),
    })?;
    Ok(())
}

async fn release_pending_slot(
    tx: &mut Transaction<'_, Postgres>,
    staff_id: &StaffId,
    venue_id: &VenueId,
) -> Result<(), TransferStoreError> {
    sqlx::query(
        "DELETE FROM pending_transfers WHERE staff_id = $1 AND venue_id = $2",
    )
    .bind(staff_id.as_ref())
    .bind(venue_id.as_ref())
    .execute(&mut **tx)
    .await
    .map_err(|e| TransferStoreError::UnexpectedError(eyre!(e)))?;
    Ok(())
}

fn status_from_row(row: &PgRow) -> Result<TransferStatus> {
    let status: String = row.try_get("status")?;
    match status.as_str() {
        "pending" => Ok(TransferStatus::Pending),
        "approved" | "denied" => {
            let approver_id: Option<Uuid> = row.try_get("approver_id")?;
            let resolved_at: Option<DateTime<Utc>> =
                row.try_get("resolved_at")?;
            let (Some(approver_id), Some(resolved_at)) =
                (approver_id, resolved_at)
            else {
                bail!("resolved transfer row is missing resolution columns");
            };
            let resolution = Resolution {
                approver_id: StaffId::new(approver_id),
                note: row.try_get("response_note")?,
                resolved_at,
            };
            if status == "approved" {
                Ok(TransferStatus::Approved(resolution))
            } else {
                Ok(TransferStatus::Denied(resolution))
            }
        }
        other => bail!("unknown transfer status in database: {other}"),
    }
}

fn request_from_row(row: &PgRow) -> Result<ShiftRequest> {
    let kind: String = row.try_get("kind")?;
    Ok(ShiftRequest {
        id: RequestId::new(row.try_get("id")?),
        venue_id: VenueId::new(row.try_get("venue_id")?),
        staff_id: StaffId::new(row.try_get("staff_id")?),
        shift_id: ShiftId::new(row.try_get("shift_id")?),
        kind: kind.parse::<RequestKind>().map_err(|e| eyre!(e))?,
        reason: row.try_get("reason")?,
        status: status_from_row(row)?,
        created_at: row.try_get("created_at")?,
    })
}

fn swap_from_row(row: &PgRow) -> Result<ShiftSwap> {
    Ok(ShiftSwap {
        id: SwapId::new(row.try_get("id")?),
        venue_id: VenueId::new(row.try_get("venue_id")?),
        requester_id: StaffId::new(row.try_get("requester_id")?),
        offered_shift_id: ShiftId::new(row.try_get("offered_shift_id")?),
        target_shift_id: ShiftId::new(row.try_get("target_shift_id")?),
        reason: row.try_get("reason")?,
        status: status_from_row(row)?,
        created_at: row.try_get("created_at")?,
    })
}

fn decision_label(decision: Decision) -> &'static str {
    match decision {
        Decision::Approved => "approved",
        Decision::Denied => "denied",
    }
}

#[async_trait::async_trait]
impl TransferStore for PostgresTransferStore {
    #[tracing::instrument(
        name = "Checking pending transfer in PostgreSQL",
        skip_all
    )]
    async fn has_pending(
        &self,
        staff_id: &StaffId,
        venue_id: &VenueId,
    ) -> Result<bool, TransferStoreError> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM pending_transfers
                WHERE staff_id = $1 AND venue_id = $2
            ) AS pending
            "#,
        )
        .bind(staff_id.as_ref())
        .bind(venue_id.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TransferStoreError::UnexpectedError(eyre!(e)))?;
        row.try_get("pending")
            .map_err(|e| TransferStoreError::UnexpectedError(eyre!(e)))
    }

    #[tracing::instrument(name = "Adding request to PostgreSQL", skip_all)]
    async fn add_request(
        &mut self,
        request: ShiftRequest,
    ) -> Result<(), TransferStoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| TransferStoreError::UnexpectedError(eyre!(e)))?;

        claim_pending_slot(&mut tx, &request.staff_id, &request.venue_id)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO shift_requests
                (id, venue_id, staff_id, shift_id, kind, reason, status,
                 created_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7)
            "#,
        )
        .bind(request.id.as_ref())
        .bind(request.venue_id.as_ref())
        .bind(request.staff_id.as_ref())
        .bind(request.shift_id.as_ref())
        .bind(request.kind.to_string())
        .bind(&request.reason)
        .bind(request.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| TransferStoreError::UnexpectedError(eyre!(e)))?;

        tx.commit()
            .await
            .map_err(|e| TransferStoreError::UnexpectedError(eyre!(e)))?;
        Ok(())
    }

    #[tracing::instrument(name = "Adding swap to PostgreSQL", skip_all)]
    async fn add_swap(
        &mut self,
        swap: ShiftSwap,
    ) -> Result<(), TransferStoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| TransferStoreError::UnexpectedError(eyre!(e)))?;

        claim_pending_slot(&mut tx, &swap.requester_id, &swap.venue_id)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO shift_swaps
                (id, venue_id, requester_id, offered_shift_id,
                 target_shift_id, reason, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7)
            "#,
        )
        .bind(swap.id.as_ref())
        .bind(swap.venue_id.as_ref())
        .bind(swap.requester_id.as_ref())
        .bind(swap.offered_shift_id.as_ref())
        .bind(swap.target_shift_id.as_ref())
        .bind(&swap.reason)
        .bind(swap.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| TransferStoreError::UnexpectedError(eyre!(e)))?;

        tx.commit()
            .await
            .map_err(|e| TransferStoreError::UnexpectedError(eyre!(e)))?;
        Ok(())
    }

    #[tracing::instrument(name = "Getting request from PostgreSQL", skip_all)]
    async fn get_request(
        &self,
        request_id: &RequestId,
    ) -> Result<ShiftRequest, TransferStoreError> {
        let row = sqlx::query("SELECT * FROM shift_requests WHERE id = $1")
            .bind(request_id.as_ref())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    TransferStoreError::RequestNotFound
                }
                e => TransferStoreError::UnexpectedError(eyre!(e)),
            })?;
        request_from_row(&row)
            .map_err(TransferStoreError::UnexpectedError)
    }

    #[tracing::instrument(name = "Getting swap from PostgreSQL", skip_all)]
    async fn get_swap(
        &self,
        swap_id: &SwapId,
    ) -> Result<ShiftSwap, TransferStoreError> {
        let row = sqlx::query("SELECT * FROM shift_swaps WHERE id = $1")
            .bind(swap_id.as_ref())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => TransferStoreError::SwapNotFound,
                e => TransferStoreError::UnexpectedError(eyre!(e)),
            })?;
        swap_from_row(&row).map_err(TransferStoreError::UnexpectedError)
    }

    #[tracing::instrument(name = "Resolving request in PostgreSQL", skip_all)]
    async fn resolve_request(
        &mut self,
        request_id: &RequestId,
        decision: Decision,
        resolution: Resolution,
    ) -> Result<ShiftRequest, TransferStoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| TransferStoreError::UnexpectedError(eyre!(e)))?;

        // the status guard makes this a compare-and-set: a request resolved
        // by a concurrent approver yields no row here
        let row = sqlx::query(
            r#"
            UPDATE shift_requests
            SET status = $2, response_note = $3, approver_id = $4,
                resolved_at = $5
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(request_id.as_ref())
        .bind(decision_label(decision))
        .bind(&resolution.note)
        .bind(resolution.approver_id.as_ref())
        .bind(resolution.resolved_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| TransferStoreError::UnexpectedError(eyre!(e)))?;

        let Some(row) = row else {
            return Err(match self.get_request(request_id).await {
                Ok(_) => TransferStoreError::AlreadyResolved,
                Err(e) => e,
            });
        };

        let request = request_from_row(&row)
            .map_err(TransferStoreError::UnexpectedError)?;
        release_pending_slot(&mut tx, &request.staff_id, &request.venue_id)
            .await?;

        tx.commit()
            .await
            .map_err(|e| TransferStoreError::UnexpectedError(eyre!(e)))?;
        Ok(request)
    }

    #[tracing::instrument(name = "Resolving swap in PostgreSQL", skip_all)]
    async fn resolve_swap(
        &mut self,
        swap_id: &SwapId,
        decision: Decision,
        resolution: Resolution,
    ) -> Result<ShiftSwap, TransferStoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| TransferStoreError::UnexpectedError(eyre!(e)))?;

        let row = sqlx::query(
            r#"
            UPDATE shift_swaps
            SET status = $2, response_note = $3, approver_id = $4,
                resolved_at = $5
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(swap_id.as_ref())
        .bind(decision_label(decision))
        .bind(&resolution.note)
        .bind(resolution.approver_id.as_ref())
        .bind(resolution.resolved_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| TransferStoreError::UnexpectedError(eyre!(e)))?;

        let Some(row) = row else {
            return Err(match self.get_swap(swap_id).await {
                Ok(_) => TransferStoreError::AlreadyResolved,
                Err(e) => e,
            });
        };

        let swap =
            swap_from_row(&row).map_err(TransferStoreError::UnexpectedError)?;
        release_pending_slot(&mut tx, &swap.requester_id, &swap.venue_id)
            .await?;

        tx.commit()
            .await
            .map_err(|e| TransferStoreError::UnexpectedError(eyre!(e)))?;
        Ok(swap)
    }

    #[tracing::instrument(name = "Listing requests from PostgreSQL", skip_all)]
    async fn list_requests(
        &self,
        venue_id: &VenueId,
        filter: &RequestFilter,
    ) -> Result<Vec<ShiftRequest>, TransferStoreError> {
        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT * FROM shift_requests WHERE venue_id = ",
        );
        query.push_bind(venue_id.as_ref());
        if let Some(status) = filter.status {
            query.push(" AND status = ");
            query.push_bind(status.to_string());
        }
        if let Some(staff_id) = &filter.staff_id {
            query.push(" AND staff_id = ");
            query.push_bind(staff_id.as_ref());
        }
        if let Some(kind) = filter.kind {
            query.push(" AND kind = ");
            query.push_bind(kind.to_string());
        }
        query.push(" ORDER BY created_at");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TransferStoreError::UnexpectedError(eyre!(e)))?;

        rows.iter()
            .map(|row| {
                request_from_row(row)
                    .map_err(TransferStoreError::UnexpectedError)
            })
            .collect()
    }

    #[tracing::instrument(name = "Listing swaps from PostgreSQL", skip_all)]
    async fn list_swaps(
        &self,
        venue_id: &VenueId,
        filter: &SwapFilter,
    ) -> Result<Vec<ShiftSwap>, TransferStoreError> {
        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT * FROM shift_swaps WHERE venue_id = ",
        );
        query.push_bind(venue_id.as_ref());
        if let Some(status) = filter.status {
            query.push(" AND status = ");
            query.push_bind(status.to_string());
        }
        if let Some(requester_id) = &filter.requester_id {
            query.push(" AND requester_id = ");
            query.push_bind(requester_id.as_ref());
        }
        query.push(" ORDER BY created_at");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TransferStoreError::UnexpectedError(eyre!(e)))?;

        rows.iter()
            .map(|row| {
                swap_from_row(row).map_err(TransferStoreError::UnexpectedError)
            })
            .collect()
    }
}
