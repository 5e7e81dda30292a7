//! Occupancy operations: the only code that writes room membership.
//!
//! Membership lives in one column, `guests.room_id`, and a room's
//! `is_available` flag is rewritten from it in the same transaction as every
//! membership change. Each public operation is one SQLite transaction, so no
//! reader ever sees a guest attached to a room whose flag still says
//! available, or the reverse.

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use super::guests::insert_guest;
use super::{load_guest, load_room, Database};
use crate::models::*;

impl Database {
    /// Creates a guest inside the given room.
    ///
    /// `room_id` wins over any `input.room_id`. Returns the updated room, or
    /// `None` if the room does not exist.
    pub fn add_guest_to_room(
        &self,
        room_id: Uuid,
        input: CreateGuestInput,
    ) -> Result<Option<Room>> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;

        if !room_exists(&tx, room_id)? {
            tracing::warn!("No room found with ID {}", room_id);
            return Ok(None);
        }

        let mut guest = insert_guest(&tx, &input)?;
        attach_guest(&tx, room_id, &mut guest)?;

        let room = load_room(&tx, room_id)?;
        tx.commit()?;

        tracing::info!("Added guest {} ({}) to room {}", guest.name, guest.id, room_id);
        Ok(room)
    }

    /// Moves an existing guest into the given room.
    ///
    /// A guest occupying another room is detached from it first and that room's
    /// availability is recomputed. Returns the updated room, or `None` if either
    /// the room or the guest does not exist.
    pub fn assign_guest(&self, room_id: Uuid, guest_id: Uuid) -> Result<Option<Room>> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;

        if !room_exists(&tx, room_id)? {
            tracing::warn!("No room found with ID {}", room_id);
            return Ok(None);
        }

        let Some(mut guest) = load_guest(&tx, guest_id)? else {
            tracing::warn!("No guest found with ID {}", guest_id);
            return Ok(None);
        };

        attach_guest(&tx, room_id, &mut guest)?;

        let room = load_room(&tx, room_id)?;
        tx.commit()?;

        tracing::info!("Assigned guest {} to room {}", guest_id, room_id);
        Ok(room)
    }

    /// Deletes a guest, first removing it from its room.
    ///
    /// The room becomes available only if no other guest remains. Returns
    /// `false` if the guest does not exist.
    pub fn remove_guest(&self, guest_id: Uuid) -> Result<bool> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;

        let Some(mut guest) = load_guest(&tx, guest_id)? else {
            tracing::info!("No guest found with ID {}", guest_id);
            return Ok(false);
        };

        detach(&tx, &mut guest)?;
        tx.execute("DELETE FROM guests WHERE id = ?", [guest_id.to_string()])?;
        tx.commit()?;

        tracing::info!("Removed guest {} ({})", guest.name, guest_id);
        Ok(true)
    }

    /// Vacates the guest's room without deleting the guest.
    ///
    /// Returns the updated guest, or `None` if it does not exist. A guest with
    /// no room is returned unchanged.
    pub fn detach_guest(&self, guest_id: Uuid) -> Result<Option<Guest>> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;

        let Some(mut guest) = load_guest(&tx, guest_id)? else {
            tracing::warn!("No guest found with ID {}", guest_id);
            return Ok(None);
        };

        detach(&tx, &mut guest)?;
        tx.commit()?;

        Ok(Some(guest))
    }

    /// Deletes a room, detaching (never deleting) its guests.
    ///
    /// Returns `false` if the room does not exist.
    pub fn remove_room(&self, room_id: Uuid) -> Result<bool> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;

        if !room_exists(&tx, room_id)? {
            tracing::info!("No room found with ID {}", room_id);
            return Ok(false);
        }

        let detached = tx.execute(
            "UPDATE guests SET room_id = NULL, updated_at = ? WHERE room_id = ?",
            (Utc::now().to_rfc3339(), room_id.to_string()),
        )?;
        tx.execute("DELETE FROM rooms WHERE id = ?", [room_id.to_string()])?;
        tx.commit()?;

        tracing::info!("Removed room {}, detached {} guests", room_id, detached);
        Ok(true)
    }
}

pub(super) fn room_exists(conn: &Connection, room_id: Uuid) -> Result<bool> {
    let count: i32 = conn.query_row(
        "SELECT COUNT(*) FROM rooms WHERE id = ?",
        [room_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Points the guest at `room_id` and marks the room occupied. If the guest was
/// in a different room, that room's availability is recomputed.
///
/// The caller must have checked that the room exists.
pub(super) fn attach_guest(conn: &Connection, room_id: Uuid, guest: &mut Guest) -> Result<()> {
    let previous = guest.room_id;
    let now = Utc::now();

    conn.execute(
        "UPDATE guests SET room_id = ?, updated_at = ? WHERE id = ?",
        (room_id.to_string(), now.to_rfc3339(), guest.id.to_string()),
    )?;

    // Any room with a guest is occupied, there is no capacity limit
    conn.execute(
        "UPDATE rooms SET is_available = 0, updated_at = ? WHERE id = ?",
        (now.to_rfc3339(), room_id.to_string()),
    )?;

    if let Some(previous) = previous.filter(|p| *p != room_id) {
        recompute_availability(conn, previous)?;
    }

    guest.room_id = Some(room_id);
    guest.updated_at = now;
    Ok(())
}

/// Clears the guest's room and recomputes that room's availability.
fn detach(conn: &Connection, guest: &mut Guest) -> Result<()> {
    let Some(room_id) = guest.room_id else {
        return Ok(());
    };
    let now = Utc::now();

    conn.execute(
        "UPDATE guests SET room_id = NULL, updated_at = ? WHERE id = ?",
        (now.to_rfc3339(), guest.id.to_string()),
    )?;
    recompute_availability(conn, room_id)?;

    guest.room_id = None;
    guest.updated_at = now;
    Ok(())
}

/// Rewrites `is_available` from the room's current guest set.
fn recompute_availability(conn: &Connection, room_id: Uuid) -> Result<()> {
    conn.execute(
        "UPDATE rooms
         SET is_available = NOT EXISTS (SELECT 1 FROM guests WHERE room_id = ?1),
             updated_at = ?2
         WHERE id = ?1",
        (room_id.to_string(), Utc::now().to_rfc3339()),
    )?;
    Ok(())
}
