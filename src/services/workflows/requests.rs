use color_eyre::eyre::eyre;

use super::{
    classify_ledger_failure, shift_lookup_error, system_note,
    transfer_store_error, ApprovalFailure,
};
use crate::app_state::AppState;
use crate::domain::{
    AssignmentStore, Capability, ConflictKind, Decision, RequestFilter,
    RequestId, RequestKind, Resolution, ScheduleAPIError, ShiftId,
    ShiftRequest, ShiftStore, StaffId, TransferStore, VenueId,
};
use crate::utils::permissions::ensure_capability;

/// Validate and record a drop/pickup request. Structural problems are
/// rejected here and leave nothing behind; the duplicate-pending check is
/// re-run atomically inside the store on insert.
#[tracing::instrument(name = "Create shift request workflow", skip_all)]
pub async fn create(
    state: &AppState,
    venue_id: VenueId,
    staff_id: StaffId,
    shift_id: ShiftId,
    kind: RequestKind,
    reason: String,
) -> Result<ShiftRequest, ScheduleAPIError> {
    ensure_capability(
        &state.permission_gate,
        &staff_id,
        &venue_id,
        Capability::CreateTransfer,
    )
    .await?;

    let shift = state
        .shift_store
        .read()
        .await
        .get_shift(&shift_id)
        .await
        .map_err(|e| shift_lookup_error(e, &shift_id))?;
    if shift.venue_id != venue_id {
        return Err(ScheduleAPIError::IDNotFoundError(*shift_id.as_ref()));
    }

    let mut transfers = state.transfer_store.write().await;
    if transfers
        .has_pending(&staff_id, &venue_id)
        .await
        .map_err(transfer_store_error)?
    {
        return Err(ScheduleAPIError::Conflict(
            ConflictKind::DuplicatePendingTransfer,
        ));
    }

    {
        let ledger = state.assignment_store.read().await;
        let assigned = ledger
            .is_assigned(&staff_id, &shift_id)
            .await
            .map_err(|e| ScheduleAPIError::UnexpectedError(eyre!(e)))?;
        match kind {
            RequestKind::Drop => {
                if !assigned {
                    return Err(ScheduleAPIError::Conflict(
                        ConflictKind::NotAssigned,
                    ));
                }
            }
            RequestKind::Pickup => {
                if assigned {
                    return Err(ScheduleAPIError::Conflict(
                        ConflictKind::AlreadyAssigned,
                    ));
                }
                let count = ledger
                    .assignment_count(&shift_id)
                    .await
                    .map_err(|e| {
                        ScheduleAPIError::UnexpectedError(eyre!(e))
                    })?;
                if count >= shift.required_headcount.as_capacity() {
                    return Err(ScheduleAPIError::Conflict(
                        ConflictKind::ShiftFull,
                    ));
                }
            }
        }
    }

    let request =
        ShiftRequest::new(venue_id, staff_id, shift_id, kind, reason);
    transfers
        .add_request(request.clone())
        .await
        .map_err(transfer_store_error)?;
    Ok(request)
}

/// Apply an approver's decision. A denial never touches the ledger. An
/// approval attempts the ledger mutation first and records the outcome: a
/// conflict discovered here means the world changed since the request was
/// created, and the record is closed as `denied` with a system note instead
/// of being left pending.
#[tracing::instrument(name = "Resolve shift request workflow", skip_all)]
pub async fn resolve(
    state: &AppState,
    request_id: RequestId,
    decision: Decision,
    note: Option<String>,
    approver_id: StaffId,
) -> Result<ShiftRequest, ScheduleAPIError> {
    let mut transfers = state.transfer_store.write().await;

    let request = transfers
        .get_request(&request_id)
        .await
        .map_err(|e| match e {
            crate::domain::TransferStoreError::RequestNotFound => {
                ScheduleAPIError::IDNotFoundError(*request_id.as_ref())
            }
            e => ScheduleAPIError::UnexpectedError(eyre!(e)),
        })?;

    ensure_capability(
        &state.permission_gate,
        &approver_id,
        &request.venue_id,
        Capability::ResolveTransfer,
    )
    .await?;

    if !request.status.is_pending() {
        return Err(ScheduleAPIError::Conflict(ConflictKind::AlreadyResolved));
    }

    if decision == Decision::Denied {
        return transfers
            .resolve_request(
                &request_id,
                Decision::Denied,
                Resolution::new(approver_id, note),
            )
            .await
            .map_err(transfer_store_error);
    }

    let ledger_outcome = match request.kind {
        RequestKind::Drop => {
            let mut ledger = state.assignment_store.write().await;
            ledger.unassign(&request.staff_id, &request.shift_id).await
        }
        RequestKind::Pickup => {
            // shift store is consulted before the ledger guard is taken,
            // keeping the transfers -> shifts -> assignments lock order
            let required_headcount = state
                .shift_store
                .read()
                .await
                .required_headcount(&request.shift_id)
                .await
                .map_err(|e| ScheduleAPIError::UnexpectedError(eyre!(e)))?;
            let mut ledger = state.assignment_store.write().await;
            ledger
                .assign(
                    &request.staff_id,
                    &request.shift_id,
                    required_headcount,
                )
                .await
        }
    };

    match ledger_outcome {
        Ok(()) => transfers
            .resolve_request(
                &request_id,
                Decision::Approved,
                Resolution::new(approver_id, note),
            )
            .await
            .map_err(transfer_store_error),
        Err(e) => match classify_ledger_failure(e) {
            ApprovalFailure::Conflict(conflict) => transfers
                .resolve_request(
                    &request_id,
                    Decision::Denied,
                    Resolution::new(
                        approver_id,
                        Some(system_note(conflict)),
                    ),
                )
                .await
                .map_err(transfer_store_error),
            ApprovalFailure::Storage(e) => Err(e),
        },
    }
}

#[tracing::instrument(name = "List shift requests workflow", skip_all)]
pub async fn list(
    state: &AppState,
    venue_id: VenueId,
    actor_id: StaffId,
    filter: RequestFilter,
) -> Result<Vec<ShiftRequest>, ScheduleAPIError> {
    ensure_capability(
        &state.permission_gate,
        &actor_id,
        &venue_id,
        Capability::ViewSchedule,
    )
    .await?;

    state
        .transfer_store
        .read()
        .await
        .list_requests(&venue_id, &filter)
        .await
        .map_err(transfer_store_error)
}
