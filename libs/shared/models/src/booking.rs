use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

// ==============================================================================
// CANONICAL SLOT TIME
// ==============================================================================

/// The single canonical representation of a bookable point in time.
///
/// Slots are keyed by their start time, and the schedule update that flips a
/// slot matches on the exact textual form. `SlotTime` therefore normalizes
/// everything to whole-second UTC and always renders as
/// `YYYY-MM-DDTHH:MM:SS`. RFC 3339 input with an offset is accepted and
/// converted; sub-second precision is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotTime(NaiveDateTime);

pub const SLOT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid slot time {value:?}, expected {SLOT_TIME_FORMAT} or RFC 3339")]
pub struct SlotTimeError {
    pub value: String,
}

impl SlotTime {
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let naive = dt.naive_utc();
        SlotTime(naive.with_nanosecond(0).unwrap_or(naive))
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }
}

impl FromStr for SlotTime {
    type Err = SlotTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, SLOT_TIME_FORMAT) {
            return Ok(SlotTime(naive));
        }
        // Offset-carrying input is normalized to UTC.
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(SlotTime::from_datetime(dt.with_timezone(&Utc)));
        }
        Err(SlotTimeError { value: s.to_string() })
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(SLOT_TIME_FORMAT))
    }
}

impl Serialize for SlotTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

// ==============================================================================
// PERSISTED RECORDS
// ==============================================================================

/// User document, owned exclusively by the user store. The appointment list
/// is embedded inline and only the booking coordinator appends or removes
/// entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

impl UserRecord {
    pub fn find_appointment(&self, appointment_id: Uuid) -> Option<&Appointment> {
        self.appointments.iter().find(|apt| apt.id == appointment_id)
    }
}

/// A confirmed booking. Created by `book`, removed only by `cancel`, never
/// mutated in between.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: String,
    pub provider_id: String,
    pub start_datetime: SlotTime,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

/// Per-provider schedule document, one per provider, slot list embedded
/// inline and keyed by `start_datetime` (at most one slot per distinct time).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSchedule {
    pub provider_id: String,
    #[serde(default)]
    pub availability: Vec<Slot>,
}

impl ProviderSchedule {
    pub fn slot_at(&self, start: &SlotTime) -> Option<&Slot> {
        self.availability.iter().find(|slot| slot.start_datetime == *start)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub start_datetime: SlotTime,
    pub is_booked: bool,
}
