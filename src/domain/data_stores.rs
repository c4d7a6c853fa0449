use super::{
    Decision, Headcount, RequestId, RequestKind, Resolution, Shift,
    ShiftId, ShiftRequest, ShiftSwap, StaffId, StatusKind, SwapId, VenueId,
};
use color_eyre::eyre::Report;
use thiserror::Error;

/// Lookup surface over shift definitions. Mutation of shifts themselves is a
/// venue-management concern; `add_shift` exists as the seam through which
/// management (and tests) seed the catalogue.
#[async_trait::async_trait]
pub trait ShiftStore {
    async fn add_shift(&mut self, shift: Shift)
        -> Result<(), ShiftStoreError>;
    async fn get_shift(
        &self,
        shift_id: &ShiftId,
    ) -> Result<Shift, ShiftStoreError>;
    async fn required_headcount(
        &self,
        shift_id: &ShiftId,
    ) -> Result<Headcount, ShiftStoreError>;
}

#[derive(Debug, Error)]
pub enum ShiftStoreError {
    #[error("Shift ID exists")]
    ShiftIdExists,
    #[error("Shift not found")]
    ShiftNotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for ShiftStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::ShiftIdExists, Self::ShiftIdExists)
                | (Self::ShiftNotFound, Self::ShiftNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// The authoritative record of who holds which shift slot. Every mutating
/// method performs its precondition checks and the write as one indivisible
/// step with respect to other calls on the same store, so the per-shift
/// capacity invariant cannot be raced through this interface.
#[async_trait::async_trait]
pub trait AssignmentStore {
    async fn is_assigned(
        &self,
        staff_id: &StaffId,
        shift_id: &ShiftId,
    ) -> Result<bool, AssignmentStoreError>;
    async fn assignment_count(
        &self,
        shift_id: &ShiftId,
    ) -> Result<usize, AssignmentStoreError>;
    /// Current holders of a shift, in a stable order.
    async fn holders(
        &self,
        shift_id: &ShiftId,
    ) -> Result<Vec<StaffId>, AssignmentStoreError>;
    async fn assign(
        &mut self,
        staff_id: &StaffId,
        shift_id: &ShiftId,
        required_headcount: Headcount,
    ) -> Result<(), AssignmentStoreError>;
    async fn unassign(
        &mut self,
        staff_id: &StaffId,
        shift_id: &ShiftId,
    ) -> Result<(), AssignmentStoreError>;
    /// Exchange two assignments as an all-or-nothing unit: the requester
    /// leaves the offered shift and takes the target shift, the counterparty
    /// leaves the target shift and takes the offered shift. Any step failing
    /// rolls back the steps already applied and returns that step's error.
    async fn swap_assignments(
        &mut self,
        requester_id: &StaffId,
        offered_shift_id: &ShiftId,
        counterparty_id: &StaffId,
        target_shift_id: &ShiftId,
        offered_headcount: Headcount,
        target_headcount: Headcount,
    ) -> Result<(), AssignmentStoreError>;
}

#[derive(Debug, Error)]
pub enum AssignmentStoreError {
    #[error("Staff member is already assigned to this shift")]
    AlreadyAssigned,
    #[error("Shift is already at required headcount")]
    ShiftFull,
    #[error("No such assignment")]
    AssignmentNotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for AssignmentStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::AlreadyAssigned, Self::AlreadyAssigned)
                | (Self::ShiftFull, Self::ShiftFull)
                | (Self::AssignmentNotFound, Self::AssignmentNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Requests and swaps live in one store so the one-pending-transfer-per-staff
/// invariant can span both record types. The duplicate-pending check happens
/// inside `add_request`/`add_swap`, not as a separate call before them.
#[async_trait::async_trait]
pub trait TransferStore {
    async fn has_pending(
        &self,
        staff_id: &StaffId,
        venue_id: &VenueId,
    ) -> Result<bool, TransferStoreError>;
    async fn add_request(
        &mut self,
        request: ShiftRequest,
    ) -> Result<(), TransferStoreError>;
    async fn add_swap(
        &mut self,
        swap: ShiftSwap,
    ) -> Result<(), TransferStoreError>;
    async fn get_request(
        &self,
        request_id: &RequestId,
    ) -> Result<ShiftRequest, TransferStoreError>;
    async fn get_swap(
        &self,
        swap_id: &SwapId,
    ) -> Result<ShiftSwap, TransferStoreError>;
    /// Compare-and-set `pending` to the terminal status for `decision`.
    /// Fails with `AlreadyResolved` if the record is not pending.
    async fn resolve_request(
        &mut self,
        request_id: &RequestId,
        decision: Decision,
        resolution: Resolution,
    ) -> Result<ShiftRequest, TransferStoreError>;
    async fn resolve_swap(
        &mut self,
        swap_id: &SwapId,
        decision: Decision,
        resolution: Resolution,
    ) -> Result<ShiftSwap, TransferStoreError>;
    async fn list_requests(
        &self,
        venue_id: &VenueId,
        filter: &RequestFilter,
    ) -> Result<Vec<ShiftRequest>, TransferStoreError>;
    async fn list_swaps(
        &self,
        venue_id: &VenueId,
        filter: &SwapFilter,
    ) -> Result<Vec<ShiftSwap>, TransferStoreError>;
}

#[derive(Debug, Error)]
pub enum TransferStoreError {
    #[error("Staff member already has a pending transfer in this venue")]
    DuplicatePendingTransfer,
    #[error("Request not found")]
    RequestNotFound,
    #[error("Swap not found")]
    SwapNotFound,
    #[error("Transfer is already resolved")]
    AlreadyResolved,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for TransferStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (
                Self::DuplicatePendingTransfer,
                Self::DuplicatePendingTransfer
            ) | (Self::RequestNotFound, Self::RequestNotFound)
                | (Self::SwapNotFound, Self::SwapNotFound)
                | (Self::AlreadyResolved, Self::AlreadyResolved)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub status: Option<StatusKind>,
    pub staff_id: Option<StaffId>,
    pub kind: Option<RequestKind>,
}

#[derive(Debug, Clone, Default)]
pub struct SwapFilter {
    pub status: Option<StatusKind>,
    pub requester_id: Option<StaffId>,
}
