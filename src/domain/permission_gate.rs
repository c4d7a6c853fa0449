use super::{StaffId, VenueId};
use color_eyre::eyre::Result;

/// Scheduling capabilities an actor may hold at a venue. Authorization is
/// owned by the surrounding platform; this core only asks yes/no questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ViewSchedule,
    CreateTransfer,
    ResolveTransfer,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ViewSchedule => "view_schedule",
            Capability::CreateTransfer => "create_transfer",
            Capability::ResolveTransfer => "resolve_transfer",
        }
    }
}

/// A `false` answer means the actor is not authorized; an `Err` means the
/// gate itself could not be consulted and the operation must not proceed.
#[async_trait::async_trait]
pub trait PermissionGate {
    async fn check(
        &self,
        actor_id: &StaffId,
        venue_id: &VenueId,
        capability: Capability,
    ) -> Result<bool>;
}
