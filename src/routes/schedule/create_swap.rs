use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use super::ShiftSwapResponse;
use crate::{
    domain::{ScheduleAPIError, ShiftId, StaffId, VenueId},
    services::workflows,
    AppState,
};

#[tracing::instrument(name = "Create shift swap route handler", skip_all)]
pub async fn create_swap(
    State(state): State<AppState>,
    Json(request): Json<CreateSwapRequest>,
) -> Result<(StatusCode, Json<ShiftSwapResponse>), ScheduleAPIError> {
    let venue_id = VenueId::new(request.venue_id);
    let requester_id = StaffId::new(request.requester_id);
    let offered_shift_id = ShiftId::new(request.offered_shift_id);
    let target_shift_id = ShiftId::new(request.target_shift_id);

    let created = workflows::swaps::create(
        &state,
        venue_id,
        requester_id,
        offered_shift_id,
        target_shift_id,
        request.reason,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct CreateSwapRequest {
    #[serde(rename = "venueId")]
    pub venue_id: uuid::Uuid,
    #[serde(rename = "requesterId")]
    pub requester_id: uuid::Uuid,
    #[serde(rename = "offeredShiftId")]
    pub offered_shift_id: uuid::Uuid,
    #[serde(rename = "targetShiftId")]
    pub target_shift_id: uuid::Uuid,
    pub reason: String,
}
