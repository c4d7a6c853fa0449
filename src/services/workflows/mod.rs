pub mod requests;
pub mod swaps;

use color_eyre::eyre::eyre;

use crate::domain::{
    AssignmentStoreError, ConflictKind, ScheduleAPIError, ShiftId,
    ShiftStoreError, TransferStoreError,
};

fn shift_lookup_error(
    error: ShiftStoreError,
    shift_id: &ShiftId,
) -> ScheduleAPIError {
    match error {
        ShiftStoreError::ShiftNotFound => {
            ScheduleAPIError::IDNotFoundError(*shift_id.as_ref())
        }
        e => ScheduleAPIError::UnexpectedError(eyre!(e)),
    }
}

fn transfer_store_error(error: TransferStoreError) -> ScheduleAPIError {
    match error {
        TransferStoreError::DuplicatePendingTransfer => {
            ScheduleAPIError::Conflict(ConflictKind::DuplicatePendingTransfer)
        }
        TransferStoreError::AlreadyResolved => {
            ScheduleAPIError::Conflict(ConflictKind::AlreadyResolved)
        }
        e => ScheduleAPIError::UnexpectedError(eyre!(e)),
    }
}

/// Classify a ledger failure seen while applying an approval. Conflicts are
/// races that surfaced after the record was validated at create time; they
/// degrade the record to `denied` instead of failing the resolve call.
/// Storage failures propagate and leave the record pending.
enum ApprovalFailure {
    Conflict(ConflictKind),
    Storage(ScheduleAPIError),
}

fn classify_ledger_failure(error: AssignmentStoreError) -> ApprovalFailure {
    match error {
        AssignmentStoreError::AlreadyAssigned => {
            ApprovalFailure::Conflict(ConflictKind::AlreadyAssigned)
        }
        AssignmentStoreError::ShiftFull => {
            ApprovalFailure::Conflict(ConflictKind::ShiftFull)
        }
        AssignmentStoreError::AssignmentNotFound => {
            ApprovalFailure::Conflict(ConflictKind::NotAssigned)
        }
        AssignmentStoreError::UnexpectedError(report) => {
            ApprovalFailure::Storage(ScheduleAPIError::UnexpectedError(
                report,
            ))
        }
    }
}

fn system_note(conflict: ConflictKind) -> String {
    format!("automatically denied: {conflict}")
}
