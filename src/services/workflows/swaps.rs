use color_eyre::eyre::eyre;

use super::{
    classify_ledger_failure, shift_lookup_error, system_note,
    transfer_store_error, ApprovalFailure,
};
use crate::app_state::AppState;
use crate::domain::{
    AssignmentStore, Capability, ConflictKind, Decision, Resolution,
    ScheduleAPIError, ShiftId, ShiftStore, ShiftSwap, StaffId, SwapFilter,
    SwapId, TransferStore, VenueId,
};
use crate::utils::permissions::ensure_capability;

/// Validate and record a bilateral swap offer. The counterparty is not
/// recorded: whoever holds the target shift when an approver acts is the
/// other side of the trade.
#[tracing::instrument(name = "Create shift swap workflow", skip_all)]
pub async fn create(
    state: &AppState,
    venue_id: VenueId,
    requester_id: StaffId,
    offered_shift_id: ShiftId,
    target_shift_id: ShiftId,
    reason: String,
) -> Result<ShiftSwap, ScheduleAPIError> {
    ensure_capability(
        &state.permission_gate,
        &requester_id,
        &venue_id,
        Capability::CreateTransfer,
    )
    .await?;

    let swap = ShiftSwap::new(
        venue_id.clone(),
        requester_id.clone(),
        offered_shift_id.clone(),
        target_shift_id.clone(),
        reason,
    )?;

    {
        let shifts = state.shift_store.read().await;
        for shift_id in [&offered_shift_id, &target_shift_id] {
            let shift = shifts
                .get_shift(shift_id)
                .await
                .map_err(|e| shift_lookup_error(e, shift_id))?;
            if shift.venue_id != venue_id {
                return Err(ScheduleAPIError::IDNotFoundError(
                    *shift_id.as_ref(),
                ));
            }
        }
    }

    let mut transfers = state.transfer_store.write().await;
    if transfers
        .has_pending(&requester_id, &venue_id)
        .await
        .map_err(transfer_store_error)?
    {
        return Err(ScheduleAPIError::Conflict(
            ConflictKind::DuplicatePendingTransfer,
        ));
    }

    let holds_offered = state
        .assignment_store
        .read()
        .await
        .is_assigned(&requester_id, &offered_shift_id)
        .await
        .map_err(|e| ScheduleAPIError::UnexpectedError(eyre!(e)))?;
    if !holds_offered {
        return Err(ScheduleAPIError::Conflict(
            ConflictKind::MustHoldOfferedShift,
        ));
    }

    transfers
        .add_swap(swap.clone())
        .await
        .map_err(transfer_store_error)?;
    Ok(swap)
}

/// Apply an approver's decision to a swap. Approval re-resolves the
/// counterparty from the current ledger and exchanges both assignments in
/// one atomic ledger call; any conflict discovered here closes the swap as
/// `denied` with a system note and leaves the ledger untouched.
#[tracing::instrument(name = "Resolve shift swap workflow", skip_all)]
pub async fn resolve(
    state: &AppState,
    swap_id: SwapId,
    decision: Decision,
    note: Option<String>,
    approver_id: StaffId,
) -> Result<ShiftSwap, ScheduleAPIError> {
    let mut transfers = state.transfer_store.write().await;

    let swap = transfers.get_swap(&swap_id).await.map_err(|e| match e {
        crate::domain::TransferStoreError::SwapNotFound => {
            ScheduleAPIError::IDNotFoundError(*swap_id.as_ref())
        }
        e => ScheduleAPIError::UnexpectedError(eyre!(e)),
    })?;

    ensure_capability(
        &state.permission_gate,
        &approver_id,
        &swap.venue_id,
        Capability::ResolveTransfer,
    )
    .await?;

    if !swap.status.is_pending() {
        return Err(ScheduleAPIError::Conflict(ConflictKind::AlreadyResolved));
    }

    if decision == Decision::Denied {
        return transfers
            .resolve_swap(
                &swap_id,
                Decision::Denied,
                Resolution::new(approver_id, note),
            )
            .await
            .map_err(transfer_store_error);
    }

    let (offered_headcount, target_headcount) = {
        let shifts = state.shift_store.read().await;
        let offered = shifts
            .required_headcount(&swap.offered_shift_id)
            .await
            .map_err(|e| ScheduleAPIError::UnexpectedError(eyre!(e)))?;
        let target = shifts
            .required_headcount(&swap.target_shift_id)
            .await
            .map_err(|e| ScheduleAPIError::UnexpectedError(eyre!(e)))?;
        (offered, target)
    };

    let ledger_outcome = {
        let mut ledger = state.assignment_store.write().await;

        let holds_offered = ledger
            .is_assigned(&swap.requester_id, &swap.offered_shift_id)
            .await
            .map_err(|e| ScheduleAPIError::UnexpectedError(eyre!(e)))?;
        if !holds_offered {
            Err(ConflictKind::MustHoldOfferedShift)
        } else {
            let counterparty = ledger
                .holders(&swap.target_shift_id)
                .await
                .map_err(|e| ScheduleAPIError::UnexpectedError(eyre!(e)))?
                .into_iter()
                .find(|holder| holder != &swap.requester_id);

            match counterparty {
                None => Err(ConflictKind::CounterpartyVanished),
                Some(counterparty_id) => {
                    let exchanged = ledger
                        .swap_assignments(
                            &swap.requester_id,
                            &swap.offered_shift_id,
                            &counterparty_id,
                            &swap.target_shift_id,
                            offered_headcount,
                            target_headcount,
                        )
                        .await;
                    match exchanged {
                        Ok(()) => Ok(()),
                        Err(e) => match classify_ledger_failure(e) {
                            ApprovalFailure::Conflict(conflict) => {
                                Err(conflict)
                            }
                            ApprovalFailure::Storage(e) => return Err(e),
                        },
                    }
                }
            }
        }
    };

    match ledger_outcome {
        Ok(()) => transfers
            .resolve_swap(
                &swap_id,
                Decision::Approved,
                Resolution::new(approver_id, note),
            )
            .await
            .map_err(transfer_store_error),
        Err(conflict) => transfers
            .resolve_swap(
                &swap_id,
                Decision::Denied,
                Resolution::new(approver_id, Some(system_note(conflict))),
            )
            .await
            .map_err(transfer_store_error),
    }
}

#[tracing::instrument(name = "List shift swaps workflow", skip_all)]
pub async fn list(
    state: &AppState,
    venue_id: VenueId,
    actor_id: StaffId,
    filter: SwapFilter,
) -> Result<Vec<ShiftSwap>, ScheduleAPIError> {
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
        .list_swaps(&venue_id, &filter)
        .await
        .map_err(transfer_store_error)
}
