use super::{StaffId, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a request or swap. `Pending` is the only state from which a
/// transition exists; the terminal states carry the resolution so a resolved
/// record without approver/timestamp cannot be constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransferStatus {
    Pending,
    Approved(Resolution),
    Denied(Resolution),
}

impl TransferStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, TransferStatus::Pending)
    }

    pub fn kind(&self) -> StatusKind {
        match self {
            TransferStatus::Pending => StatusKind::Pending,
            TransferStatus::Approved(_) => StatusKind::Approved,
            TransferStatus::Denied(_) => StatusKind::Denied,
        }
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        match self {
            TransferStatus::Pending => None,
            TransferStatus::Approved(resolution) => Some(resolution),
            TransferStatus::Denied(resolution) => Some(resolution),
        }
    }

    pub fn resolved(decision: Decision, resolution: Resolution) -> Self {
        match decision {
            Decision::Approved => TransferStatus::Approved(resolution),
            Decision::Denied => TransferStatus::Denied(resolution),
        }
    }
}

/// Who resolved a transfer, when, and with what note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    #[serde(rename = "approverId")]
    pub approver_id: StaffId,
    pub note: Option<String>,
    #[serde(rename = "resolvedAt")]
    pub resolved_at: DateTime<Utc>,
}

impl Resolution {
    pub fn new(approver_id: StaffId, note: Option<String>) -> Self {
        Self {
            approver_id,
            note,
            resolved_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Denied,
}

impl FromStr for Decision {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Decision::Approved),
            "denied" => Ok(Decision::Denied),
            _ => Err(ValidationError::new(String::from("Invalid decision"))),
        }
    }
}

/// Flat status discriminant, used for list filters and wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Pending,
    Approved,
    Denied,
}

impl FromStr for StatusKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(StatusKind::Pending),
            "approved" => Ok(StatusKind::Approved),
            "denied" => Ok(StatusKind::Denied),
            _ => Err(ValidationError::new(String::from("Invalid status"))),
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                StatusKind::Pending => "pending",
                StatusKind::Approved => "approved",
                StatusKind::Denied => "denied",
            }
        )
    }
}
