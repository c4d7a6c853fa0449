use std::str::FromStr;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::ShiftRequestResponse;
use crate::{
    domain::{
        RequestFilter, RequestKind, ScheduleAPIError, StaffId, StatusKind,
        VenueId,
    },
    services::workflows,
    AppState,
};

#[tracing::instrument(name = "List shift requests route handler", skip_all)]
pub async fn list_requests(
    State(state): State<AppState>,
    Query(params): Query<ListRequestsParams>,
) -> Result<(StatusCode, Json<ListRequestsResponse>), ScheduleAPIError> {
    let venue_id = VenueId::new(params.venue_id);
    let actor_id = StaffId::new(params.actor_id);

    let filter = RequestFilter {
        status: params
            .status
            .as_deref()
            .map(StatusKind::from_str)
            .transpose()?,
        staff_id: params.staff_id.map(StaffId::new),
        kind: params
            .kind
            .as_deref()
            .map(RequestKind::from_str)
            .transpose()?,
    };

    let requests =
        workflows::requests::list(&state, venue_id, actor_id, filter)
            .await?;

    let response = Json(ListRequestsResponse {
        requests: requests.into_iter().map(Into::into).collect(),
    });

    Ok((StatusCode::OK, response))
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct ListRequestsParams {
    #[serde(rename = "venueId")]
    pub venue_id: uuid::Uuid,
    #[serde(rename = "actorId")]
    pub actor_id: uuid::Uuid,
    pub status: Option<String>,
    #[serde(rename = "staffId")]
    pub staff_id: Option<uuid::Uuid>,
    pub kind: Option<String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ListRequestsResponse {
    pub requests: Vec<ShiftRequestResponse>,
}
