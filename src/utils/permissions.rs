use crate::app_state::PermissionGateType;
use crate::domain::{
    Capability, PermissionGate, ScheduleAPIError, StaffId, VenueId,
};

/// Ask the gate whether the actor may perform the operation at this venue.
/// A gate failure is an unexpected error, never a silent denial.
#[tracing::instrument(name = "Check actor capability", skip_all)]
pub async fn ensure_capability(
    gate: &PermissionGateType,
    actor_id: &StaffId,
    venue_id: &VenueId,
    capability: Capability,
) -> Result<(), ScheduleAPIError> {
    let allowed = gate
        .check(actor_id, venue_id, capability)
        .await
        .map_err(ScheduleAPIError::UnexpectedError)?;

    if !allowed {
        return Err(ScheduleAPIError::Forbidden);
    }

    Ok(())
}
