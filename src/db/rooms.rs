use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

use super::{guest_from_row, load_room, room_from_row, Database, GUEST_COLUMNS, ROOM_COLUMNS};
use crate::models::*;

impl Database {
    // ============================================================
    // Room operations
    // ============================================================

    pub fn create_room(&self, input: CreateRoomInput) -> Result<Room> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO rooms (id, room_number, floor, has_kitchen, has_ac, is_available, rent, bed_type, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, 1, ?, ?, ?, ?)",
            (
                id.to_string(),
                input.room_number,
                input.floor,
                if input.has_kitchen { 1 } else { 0 },
                if input.has_ac { 1 } else { 0 },
                input.rent,
                input.bed_type.map(|b| b.as_str()),
                now.to_rfc3339(),
                now.to_rfc3339(),
            ),
        )?;

        tracing::info!("Created room {} ({})", input.room_number, id);

        Ok(Room {
            id,
            room_number: input.room_number,
            floor: input.floor,
            has_kitchen: input.has_kitchen,
            has_ac: input.has_ac,
            is_available: true,
            rent: input.rent,
            bed_type: input.bed_type,
            guests: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn get_room(&self, id: Uuid) -> Result<Option<Room>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        load_room(&conn, id)
    }

    /// All rooms with their guests, ordered by floor then room number.
    ///
    /// `available` narrows the result to rooms whose availability matches.
    pub fn get_rooms(&self, available: Option<bool>) -> Result<Vec<Room>> {
        let conn = self.conn.lock().expect("database lock poisoned");

        let mut rooms = match available {
            Some(flag) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ROOM_COLUMNS} FROM rooms WHERE is_available = ?
                     ORDER BY floor, room_number"
                ))?;
                let rooms = stmt
                    .query_map([if flag { 1 } else { 0 }], room_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rooms
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ROOM_COLUMNS} FROM rooms ORDER BY floor, room_number"
                ))?;
                let rooms = stmt
                    .query_map([], room_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rooms
            }
        };

        // One pass over occupied guests instead of a query per room
        let mut stmt = conn.prepare(&format!(
            "SELECT {GUEST_COLUMNS} FROM guests WHERE room_id IS NOT NULL ORDER BY created_at, name"
        ))?;
        let mut by_room: HashMap<Uuid, Vec<Guest>> = HashMap::new();
        for guest in stmt.query_map([], guest_from_row)? {
            let guest = guest?;
            if let Some(room_id) = guest.room_id {
                by_room.entry(room_id).or_default().push(guest);
            }
        }

        for room in &mut rooms {
            room.guests = by_room.remove(&room.id).unwrap_or_default();
        }

        tracing::debug!("Loaded {} rooms", rooms.len());
        Ok(rooms)
    }

    /// Read-only projections of [`Database::get_rooms`].
    pub fn list_room_summaries(&self, available: Option<bool>) -> Result<Vec<RoomSummary>> {
        Ok(self
            .get_rooms(available)?
            .into_iter()
            .map(RoomSummary::from)
            .collect())
    }
}
