use super::{
    ShiftId, StaffId, TransferStatus, ValidationError, VenueId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A single-shift transfer: dropping a held shift or picking up an unheld
/// one. Created `Pending` and resolved exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftRequest {
    pub id: RequestId,
    #[serde(rename = "venueId")]
    pub venue_id: VenueId,
    #[serde(rename = "staffId")]
    pub staff_id: StaffId,
    #[serde(rename = "shiftId")]
    pub shift_id: ShiftId,
    pub kind: RequestKind,
    pub reason: String,
    pub status: TransferStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl ShiftRequest {
    pub fn new(
        venue_id: VenueId,
        staff_id: StaffId,
        shift_id: ShiftId,
        kind: RequestKind,
        reason: String,
    ) -> Self {
        Self {
            id: RequestId::default(),
            venue_id,
            staff_id,
            shift_id,
            kind,
            reason,
            status: TransferStatus::Pending,
            created_at: Utc::now(),
        }
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
pub struct RequestId(Uuid);

impl RequestId {
    pub fn parse(id: &str) -> Result<Self, ValidationError> {
        let parsed = uuid::Uuid::try_parse(id).map_err(|e| {
            ValidationError::new(format!("Invalid request ID: {e}"))
        })?;
        Ok(Self(parsed))
    }

    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl AsRef<Uuid> for RequestId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    Drop,
    Pickup,
}

impl FromStr for RequestKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drop" => Ok(RequestKind::Drop),
            "pickup" => Ok(RequestKind::Pickup),
            _ => Err(ValidationError::new(String::from(
                "Invalid request kind",
            ))),
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RequestKind::Drop => "drop",
                RequestKind::Pickup => "pickup",
            }
        )
    }
}
