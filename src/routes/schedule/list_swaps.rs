use std::str::FromStr;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::ShiftSwapResponse;
use crate::{
    domain::{ScheduleAPIError, StaffId, StatusKind, SwapFilter, VenueId},
    services::workflows,
    AppState,
};

#[tracing::instrument(name = "List shift swaps route handler", skip_all)]
pub async fn list_swaps(
    State(state): State<AppState>,
    Query(params): Query<ListSwapsParams>,
) -> Result<(StatusCode, Json<ListSwapsResponse>), ScheduleAPIError> {
    let venue_id = VenueId::new(params.venue_id);
    let actor_id = StaffId::new(params.actor_id);

    let filter = SwapFilter {
        status: params
            .status
            .as_deref()
            .map(StatusKind::from_str)
            .transpose()?,
        requester_id: params.requester_id.map(StaffId::new),
    };

    let swaps =
        workflows::swaps::list(&state, venue_id, actor_id, filter).await?;

    let response = Json(ListSwapsResponse {
        swaps: swaps.into_iter().map(Into::into).collect(),
    });

    Ok((StatusCode::OK, response))
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct ListSwapsParams {
    #[serde(rename = "venueId")]
    pub venue_id: uuid::Uuid,
    #[serde(rename = "actorId")]
    pub actor_id: uuid::Uuid,
    pub status: Option<String>,
    #[serde(rename = "requesterId")]
    pub requester_id: Option<uuid::Uuid>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ListSwapsResponse {
    pub swaps: Vec<ShiftSwapResponse>,
}
