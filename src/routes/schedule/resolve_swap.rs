use std::str::FromStr;

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use super::ShiftSwapResponse;
use crate::{
    domain::{Decision, ScheduleAPIError, StaffId, SwapId},
    services::workflows,
    AppState,
};

#[tracing::instrument(name = "Resolve shift swap route handler", skip_all)]
pub async fn resolve_swap(
    State(state): State<AppState>,
    Json(request): Json<ResolveSwapRequest>,
) -> Result<(StatusCode, Json<ShiftSwapResponse>), ScheduleAPIError> {
    let swap_id = SwapId::new(request.swap_id);
    let approver_id = StaffId::new(request.approver_id);
    let decision = Decision::from_str(&request.decision)?;

    let resolved = workflows::swaps::resolve(
        &state,
        swap_id,
        decision,
        request.note,
        approver_id,
    )
    .await?;

    Ok((StatusCode::OK, Json(resolved.into())))
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct ResolveSwapRequest {
    #[serde(rename = "swapId")]
    pub swap_id: uuid::Uuid,
    pub decision: String,
    pub note: Option<String>,
    #[serde(rename = "approverId")]
    pub approver_id: uuid::Uuid,
}
