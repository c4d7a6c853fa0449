use super::{
    ShiftId, StaffId, TransferStatus, ValidationError, VenueId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bilateral trade: the requester offers a shift they hold in exchange for
/// the target shift. The counterparty is whoever holds the target shift when
/// an approver acts, not whoever held it at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftSwap {
    pub id: SwapId,
    #[serde(rename = "venueId")]
    pub venue_id: VenueId,
    #[serde(rename = "requesterId")]
    pub requester_id: StaffId,
    #[serde(rename = "offeredShiftId")]
    pub offered_shift_id: ShiftId,
    #[serde(rename = "targetShiftId")]
    pub target_shift_id: ShiftId,
    pub reason: String,
    pub status: TransferStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl ShiftSwap {
    pub fn new(
        venue_id: VenueId,
        requester_id: StaffId,
        offered_shift_id: ShiftId,
        target_shift_id: ShiftId,
        reason: String,
    ) -> Result<Self, ValidationError> {
        if offered_shift_id == target_shift_id {
            return Err(ValidationError::new(String::from(
                "Cannot swap a shift with itself",
            )));
        }

        Ok(Self {
            id: SwapId::default(),
            venue_id,
            requester_id,
            offered_shift_id,
            target_shift_id,
            reason,
            status: TransferStatus::Pending,
            created_at: Utc::now(),
        })
    }
}

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
pub struct SwapId(Uuid);

impl SwapId {
    pub fn parse(id: &str) -> Result<Self, ValidationError> {
        let parsed = uuid::Uuid::try_parse(id).map_err(|e| {
            ValidationError::new(format!("Invalid swap ID: {e}"))
        })?;
        Ok(Self(parsed))
    }

    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SwapId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl AsRef<Uuid> for SwapId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}
