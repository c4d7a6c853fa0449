mod create_request;
mod create_swap;
mod list_requests;
mod list_swaps;
mod resolve_request;
mod resolve_swap;

pub use create_request::create_request;
pub use create_swap::create_swap;
pub use list_requests::list_requests;
pub use list_swaps::list_swaps;
pub use resolve_request::resolve_request;
pub use resolve_swap::resolve_swap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ShiftRequest, ShiftSwap};

/// Wire shape of a request record. The status enum is flattened so clients
/// see `status` plus the optional resolution fields instead of a tagged enum.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ShiftRequestResponse {
    pub id: uuid::Uuid,
    #[serde(rename = "venueId")]
    pub venue_id: uuid::Uuid,
    #[serde(rename = "staffId")]
    pub staff_id: uuid::Uuid,
    #[serde(rename = "shiftId")]
    pub shift_id: uuid::Uuid,
    pub kind: String,
    pub reason: String,
    pub status: String,
    #[serde(rename = "responseNote")]
    pub response_note: Option<String>,
    #[serde(rename = "approverId")]
    pub approver_id: Option<uuid::Uuid>,
    #[serde(rename = "resolvedAt")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<ShiftRequest> for ShiftRequestResponse {
    fn from(request: ShiftRequest) -> Self {
        let resolution = request.status.resolution();
        Self {
            id: *request.id.as_ref(),
            venue_id: *request.venue_id.as_ref(),
            staff_id: *request.staff_id.as_ref(),
            shift_id: *request.shift_id.as_ref(),
            kind: request.kind.to_string(),
            reason: request.reason.clone(),
            status: request.status.kind().to_string(),
            response_note: resolution.and_then(|r| r.note.clone()),
            approver_id: resolution.map(|r| *r.approver_id.as_ref()),
            resolved_at: resolution.map(|r| r.resolved_at),
            created_at: request.created_at,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ShiftSwapResponse {
    pub id: uuid::Uuid,
    #[serde(rename = "venueId")]
    pub venue_id: uuid::Uuid,
    #[serde(rename = "requesterId")]
    pub requester_id: uuid::Uuid,
    #[serde(rename = "offeredShiftId")]
    pub offered_shift_id: uuid::Uuid,
    #[serde(rename = "targetShiftId")]
    pub target_shift_id: uuid::Uuid,
    pub reason: String,
    pub status: String,
    #[serde(rename = "responseNote")]
    pub response_note: Option<String>,
    #[serde(rename = "approverId")]
    pub approver_id: Option<uuid::Uuid>,
    #[serde(rename = "resolvedAt")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<ShiftSwap> for ShiftSwapResponse {
    fn from(swap: ShiftSwap) -> Self {
        let resolution = swap.status.resolution();
        Self {
            id: *swap.id.as_ref(),
            venue_id: *swap.venue_id.as_ref(),
            requester_id: *swap.requester_id.as_ref(),
            offered_shift_id: *swap.offered_shift_id.as_ref(),
            target_shift_id: *swap.target_shift_id.as_ref(),
            reason: swap.reason.clone(),
            status: swap.status.kind().to_string(),
            response_note: resolution.and_then(|r| r.note.clone()),
            approver_id: resolution.map(|r| *r.approver_id.as_ref()),
            resolved_at: resolution.map(|r| r.resolved_at),
            created_at: swap.created_at,
        }
    }
}
