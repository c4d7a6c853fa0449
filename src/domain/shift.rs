use super::{ValidationError, VenueId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A time-boxed staffing need at a venue. The assignment ledger never allows
/// more than `required_headcount` concurrent holders of one shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    #[serde(rename = "venueId")]
    pub venue_id: VenueId,
    pub role: ShiftRole,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "endTime")]
    pub end_time: DateTime<Utc>,
    #[serde(rename = "requiredHeadcount")]
    pub required_headcount: Headcount,
}

impl Shift {
    pub fn new(
        venue_id: VenueId,
        role: ShiftRole,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        required_headcount: Headcount,
    ) -> Result<Self, ValidationError> {
        validate_window(&start_time, &end_time)?;

        Ok(Self {
            id: ShiftId::default(),
            venue_id,
            role,
            start_time,
            end_time,
            required_headcount,
        })
    }
}

fn validate_window(
    start_time: &DateTime<Utc>,
    end_time: &DateTime<Utc>,
) -> Result<(), ValidationError> {
    if end_time > start_time {
        return Ok(());
    }
    Err(ValidationError::new(String::from(
        "Start time must be before end time",
    )))
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
pub struct ShiftId(Uuid);

impl ShiftId {
    pub fn parse(id: &str) -> Result<Self, ValidationError> {
        let parsed = uuid::Uuid::try_parse(id).map_err(|e| {
            ValidationError::new(format!("Invalid shift ID: {e}"))
        })?;
        Ok(Self(parsed))
    }

    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ShiftId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl AsRef<Uuid> for ShiftId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftRole(String);

impl ShiftRole {
    pub fn parse(role: &str) -> Result<Self, ValidationError> {
        let trimmed = role.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::new(String::from(
                "Shift role must not be empty",
            )));
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ShiftRole {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headcount(i16);

impl Headcount {
    pub fn parse(count: i16) -> Result<Self, ValidationError> {
        if count < 1 {
            return Err(ValidationError::new(String::from(
                "Required headcount must be at least 1",
            )));
        }
        Ok(Self(count))
    }

    pub fn value_of(&self) -> i16 {
        self.0
    }

    pub fn as_capacity(&self) -> usize {
        self.0 as usize
    }
}
