use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person renting space in a room.
///
/// `room_id` is a lookup, not ownership: the room owns the membership, and the
/// occupancy operations keep the two sides consistent. A guest with no room
/// is simply unassigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
    pub id: Uuid,
    pub name: String,
    pub age: i64,
    pub phone_number: Option<String>,
    /// The day the guest moved in.
    pub date_of_occupancy: Option<NaiveDate>,
    pub room_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a guest.
///
/// When `room_id` is set the guest is created already assigned to that room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGuestInput {
    pub name: String,
    pub age: i64,
    pub phone_number: Option<String>,
    pub date_of_occupancy: Option<NaiveDate>,
    #[serde(default)]
    pub room_id: Option<Uuid>,
}

/// Read-only projection of a guest, flattened with its room's location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestSummary {
    pub id: Uuid,
    pub name: String,
    pub age: i64,
    pub room_id: Option<Uuid>,
    pub room_number: Option<i64>,
    pub floor: Option<i64>,
    pub phone_number: Option<String>,
    pub date_of_occupancy: Option<NaiveDate>,
}
