use std::str::FromStr;

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use super::ShiftRequestResponse;
use crate::{
    domain::{Decision, RequestId, ScheduleAPIError, StaffId},
    services::workflows,
    AppState,
};

#[tracing::instrument(name = "Resolve shift request route handler", skip_all)]
pub async fn resolve_request(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequestRequest>,
) -> Result<(StatusCode, Json<ShiftRequestResponse>), ScheduleAPIError> {
    let request_id = RequestId::new(request.request_id);
    let approver_id = StaffId::new(request.approver_id);
    let decision = Decision::from_str(&request.decision)?;

    let resolved = workflows::requests::resolve(
        &state,
        request_id,
        decision,
        request.note,
        approver_id,
    )
    .await?;

    Ok((StatusCode::OK, Json(resolved.into())))
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct ResolveRequestRequest {
    #[serde(rename = "requestId")]
    pub request_id: uuid::Uuid,
    pub decision: String,
    pub note: Option<String>,
    #[serde(rename = "approverId")]
    pub approver_id: uuid::Uuid,
}
