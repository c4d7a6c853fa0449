use std::str::FromStr;

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use super::ShiftRequestResponse;
use crate::{
    domain::{RequestKind, ScheduleAPIError, ShiftId, StaffId, VenueId},
    services::workflows,
    AppState,
};

#[tracing::instrument(name = "Create shift request route handler", skip_all)]
pub async fn create_request(
    State(state): State<AppState>,
    Json(request): Json<CreateRequestRequest>,
) -> Result<(StatusCode, Json<ShiftRequestResponse>), ScheduleAPIError> {
    let venue_id = VenueId::new(request.venue_id);
    let staff_id = StaffId::new(request.staff_id);
    let shift_id = ShiftId::new(request.shift_id);
    let kind = RequestKind::from_str(&request.kind)?;

    let created = workflows::requests::create(
        &state,
        venue_id,
        staff_id,
        shift_id,
        kind,
        request.reason,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct CreateRequestRequest {
    #[serde(rename = "venueId")]
    pub venue_id: uuid::Uuid,
    #[serde(rename = "staffId")]
    pub staff_id: uuid::Uuid,
    #[serde(rename = "shiftId")]
    pub shift_id: uuid::Uuid,
    pub kind: String,
    pub reason: String,
}
