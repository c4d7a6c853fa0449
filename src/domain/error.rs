use color_eyre::eyre::Report;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleAPIError {
    #[error("Conflict")]
    Conflict(#[from] ConflictKind),
    #[error("Forbidden")]
    Forbidden,
    #[error("Resource with ID not found: {0}")]
    IDNotFoundError(uuid::Uuid),
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
    #[error("Validation error")]
    ValidationError(#[from] ValidationError),
}

/// Machine-readable reasons for staffing/workflow invariant violations.
/// These strings are part of the API surface: rejected creates return them
/// directly, and resolve-time races embed them in the system note on the
/// denied record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConflictKind {
    #[error("duplicate pending transfer")]
    DuplicatePendingTransfer,
    #[error("not assigned")]
    NotAssigned,
    #[error("already assigned")]
    AlreadyAssigned,
    #[error("shift full")]
    ShiftFull,
    #[error("must hold offered shift")]
    MustHoldOfferedShift,
    #[error("counterparty vanished")]
    CounterpartyVanished,
    #[error("already resolved")]
    AlreadyResolved,
}

#[derive(Debug, Error)]
#[error("Validation error: {0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: String) -> Self {
        Self(message)
    }

    pub fn as_ref(&self) -> &String {
        &self.0
    }
}
