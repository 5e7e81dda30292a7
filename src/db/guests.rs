use anyhow::Result;
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, Params, Row};
use uuid::Uuid;

use super::occupancy::{attach_guest, room_exists};
use super::{
    format_date, guest_from_row, load_guest, parse_date, parse_uuid, Database, GUEST_COLUMNS,
};
use crate::models::*;

const SUMMARY_SELECT: &str =
    "SELECT g.id, g.name, g.age, g.room_id, r.room_number, r.floor, g.phone_number, g.date_of_occupancy
     FROM guests g LEFT JOIN rooms r ON r.id = g.room_id";

impl Database {
    // ============================================================
    // Guest operations
    // ============================================================

    /// Creates a guest, optionally already assigned to a room.
    ///
    /// Returns `None` when `room_id` names a room that does not exist; nothing
    /// is written in that case.
    pub fn create_guest(&self, input: CreateGuestInput) -> Result<Option<Guest>> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;

        if let Some(room_id) = input.room_id {
            if !room_exists(&tx, room_id)? {
                tracing::warn!("No room found with ID {}", room_id);
                return Ok(None);
            }
        }

        let mut guest = insert_guest(&tx, &input)?;
        if let Some(room_id) = input.room_id {
            attach_guest(&tx, room_id, &mut guest)?;
        }

        tx.commit()?;
        tracing::info!("Created guest {} ({})", guest.name, guest.id);
        Ok(Some(guest))
    }

    pub fn get_guest(&self, id: Uuid) -> Result<Option<Guest>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        load_guest(&conn, id)
    }

    pub fn get_all_guests(&self) -> Result<Vec<Guest>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {GUEST_COLUMNS} FROM guests ORDER BY name, created_at"
        ))?;

        let guests = stmt
            .query_map([], guest_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(guests)
    }

    pub fn list_guest_summaries(&self) -> Result<Vec<GuestSummary>> {
        self.query_guest_summaries(
            &format!("{SUMMARY_SELECT} ORDER BY g.name, g.created_at"),
            [],
        )
    }

    /// Guests with `start_age <= age <= end_age`. An inverted range matches
    /// nobody.
    pub fn find_guests_by_age_between(
        &self,
        start_age: i64,
        end_age: i64,
    ) -> Result<Vec<GuestSummary>> {
        if start_age > end_age {
            tracing::debug!("Inverted age range {}..{}", start_age, end_age);
            return Ok(Vec::new());
        }

        self.query_guest_summaries(
            &format!("{SUMMARY_SELECT} WHERE g.age BETWEEN ? AND ? ORDER BY g.name, g.created_at"),
            (start_age, end_age),
        )
    }

    /// Guests whose occupancy date lies in `[start, end]`. Guests without an
    /// occupancy date never match.
    pub fn find_guests_by_occupancy_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<GuestSummary>> {
        if start > end {
            tracing::debug!("Inverted occupancy range {}..{}", start, end);
            return Ok(Vec::new());
        }

        // ISO dates compare correctly as text
        self.query_guest_summaries(
            &format!(
                "{SUMMARY_SELECT} WHERE g.date_of_occupancy BETWEEN ? AND ?
                 ORDER BY g.date_of_occupancy, g.name"
            ),
            (format_date(start), format_date(end)),
        )
    }

    fn query_guest_summaries<P: Params>(&self, sql: &str, params: P) -> Result<Vec<GuestSummary>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(sql)?;

        let guests = stmt
            .query_map(params, summary_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Guest query returned {} rows", guests.len());
        Ok(guests)
    }
}

/// Inserts an unassigned guest. Assignment goes through the occupancy path.
pub(super) fn insert_guest(conn: &Connection, input: &CreateGuestInput) -> Result<Guest> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    conn.execute(
        "INSERT INTO guests (id, name, age, phone_number, date_of_occupancy, room_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, NULL, ?, ?)",
        (
            id.to_string(),
            &input.name,
            input.age,
            &input.phone_number,
            input.date_of_occupancy.map(format_date),
            now.to_rfc3339(),
            now.to_rfc3339(),
        ),
    )?;

    Ok(Guest {
        id,
        name: input.name.clone(),
        age: input.age,
        phone_number: input.phone_number.clone(),
        date_of_occupancy: input.date_of_occupancy,
        room_id: None,
        created_at: now,
        updated_at: now,
    })
}

fn summary_from_row(row: &Row) -> rusqlite::Result<GuestSummary> {
    Ok(GuestSummary {
        id: parse_uuid(row.get::<_, String>(0)?),
        name: row.get(1)?,
        age: row.get(2)?,
        room_id: row.get::<_, Option<String>>(3)?.map(parse_uuid),
        room_number: row.get(4)?,
        floor: row.get(5)?,
        phone_number: row.get(6)?,
        date_of_occupancy: row.get::<_, Option<String>>(7)?.and_then(parse_date),
    })
}
