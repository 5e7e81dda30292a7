mod contracts;
mod guests;
mod occupancy;
mod rooms;
mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::models::*;

/// Handle to the roomledger SQLite database.
///
/// Cloning is cheap; every clone shares the same connection. Each operation
/// holds the connection lock for its whole duration, and every occupancy
/// mutation additionally runs inside a single SQLite transaction.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        tracing::debug!("Opened database at {}", path.display());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

/// Location of the database when none is configured.
pub fn default_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "roomledger")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().join("roomledger.db"))
}

// ============================================================
// Row mapping shared by the query and occupancy paths
// ============================================================

const ROOM_COLUMNS: &str = "id, room_number, floor, has_kitchen, has_ac, is_available, rent, bed_type, created_at, updated_at";

const GUEST_COLUMNS: &str =
    "id, name, age, phone_number, date_of_occupancy, room_id, created_at, updated_at";

/// Maps a row selected with [`ROOM_COLUMNS`]. Guests are loaded separately.
fn room_from_row(row: &Row) -> rusqlite::Result<Room> {
    Ok(Room {
        id: parse_uuid(row.get::<_, String>(0)?),
        room_number: row.get(1)?,
        floor: row.get(2)?,
        has_kitchen: row.get::<_, i32>(3)? != 0,
        has_ac: row.get::<_, i32>(4)? != 0,
        is_available: row.get::<_, i32>(5)? != 0,
        rent: row.get(6)?,
        bed_type: row
            .get::<_, Option<String>>(7)?
            .and_then(|s| BedType::from_str(&s)),
        guests: Vec::new(),
        created_at: parse_datetime(row.get::<_, String>(8)?),
        updated_at: parse_datetime(row.get::<_, String>(9)?),
    })
}

/// Maps a row selected with [`GUEST_COLUMNS`].
fn guest_from_row(row: &Row) -> rusqlite::Result<Guest> {
    Ok(Guest {
        id: parse_uuid(row.get::<_, String>(0)?),
        name: row.get(1)?,
        age: row.get(2)?,
        phone_number: row.get(3)?,
        date_of_occupancy: row.get::<_, Option<String>>(4)?.and_then(parse_date),
        room_id: row.get::<_, Option<String>>(5)?.map(parse_uuid),
        created_at: parse_datetime(row.get::<_, String>(6)?),
        updated_at: parse_datetime(row.get::<_, String>(7)?),
    })
}

fn load_guest(conn: &Connection, id: Uuid) -> Result<Option<Guest>> {
    let guest = conn
        .query_row(
            &format!("SELECT {GUEST_COLUMNS} FROM guests WHERE id = ?"),
            [id.to_string()],
            guest_from_row,
        )
        .optional()?;
    Ok(guest)
}

fn load_room_guests(conn: &Connection, room_id: Uuid) -> Result<Vec<Guest>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {GUEST_COLUMNS} FROM guests WHERE room_id = ? ORDER BY created_at, name"
    ))?;
    let guests = stmt
        .query_map([room_id.to_string()], guest_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(guests)
}

/// Loads a room together with its current guest set.
fn load_room(conn: &Connection, id: Uuid) -> Result<Option<Room>> {
    let room = conn
        .query_row(
            &format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = ?"),
            [id.to_string()],
            room_from_row,
        )
        .optional()?;

    match room {
        Some(mut room) => {
            room.guests = load_room_guests(conn, id)?;
            Ok(Some(room))
        }
        None => Ok(None),
    }
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn parse_date(s: String) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
