use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::guest::Guest;

/// A rentable room and the guests currently occupying it.
///
/// The room owns its guest set. Membership is stored once, as the guest's
/// `room_id`, and only the occupancy operations on [`crate::db::Database`]
/// write it.
///
/// # Invariant
/// `is_available == guests.is_empty()` after every membership change. The flag
/// is persisted so rooms can be filtered by it, but it is always rewritten from
/// the guest set inside the same transaction as the change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub room_number: i64,
    pub floor: i64,
    pub has_kitchen: bool,
    pub has_ac: bool,
    pub is_available: bool,
    /// Monthly rent asked for the room.
    pub rent: Option<i64>,
    pub bed_type: Option<BedType>,
    pub guests: Vec<Guest>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Names of the current guests, in the order they were loaded.
    pub fn guest_names(&self) -> Vec<String> {
        self.guests.iter().map(|g| g.name.clone()).collect()
    }

    pub fn has_guest(&self, guest_id: Uuid) -> bool {
        self.guests.iter().any(|g| g.id == guest_id)
    }
}

/// Bed configuration of a room.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BedType {
    Single,
    Double,
    Triple,
    Quad,
}

impl BedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Triple => "triple",
            Self::Quad => "quad",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "single" => Some(Self::Single),
            "double" => Some(Self::Double),
            "triple" => Some(Self::Triple),
            "quad" => Some(Self::Quad),
            _ => None,
        }
    }
}

/// Input for creating a new room.
///
/// There is no availability field: a new room has no guests and is therefore
/// available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomInput {
    pub room_number: i64,
    pub floor: i64,
    #[serde(default)]
    pub has_kitchen: bool,
    #[serde(default)]
    pub has_ac: bool,
    pub rent: Option<i64>,
    pub bed_type: Option<BedType>,
}

/// Read-only projection of a room for list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: Uuid,
    pub room_number: i64,
    pub floor: i64,
    pub has_kitchen: bool,
    pub has_ac: bool,
    pub is_available: bool,
    pub rent: Option<i64>,
    pub bed_type: Option<BedType>,
    pub guest_names: Vec<String>,
}

impl From<Room> for RoomSummary {
    fn from(room: Room) -> Self {
        let guest_names = room.guest_names();
        Self {
            id: room.id,
            room_number: room.room_number,
            floor: room.floor,
            has_kitchen: room.has_kitchen,
            has_ac: room.has_ac,
            is_available: room.is_available,
            rent: room.rent,
            bed_type: room.bed_type,
            guest_names,
        }
    }
}
