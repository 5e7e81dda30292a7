use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::ApiError;
use crate::db::Database;
use crate::models::*;

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Rooms
// ============================================================

/// Query parameters for listing rooms.
#[derive(Debug, Deserialize)]
pub struct ListRoomsQuery {
    /// Only rooms with this availability.
    pub available: Option<bool>,
}

pub async fn list_rooms(
    State(db): State<Database>,
    Query(query): Query<ListRoomsQuery>,
) -> Result<Json<Vec<RoomSummary>>, ApiError> {
    tracing::info!("Fetching all rooms");
    Ok(Json(db.list_room_summaries(query.available)?))
}

pub async fn get_room(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<Room>, ApiError> {
    db.get_room(id)?
        .map(Json)
        .ok_or(ApiError::NotFound("Room"))
}

pub async fn create_room(
    State(db): State<Database>,
    Json(input): Json<CreateRoomInput>,
) -> Result<(StatusCode, Json<Room>), ApiError> {
    let room = db.create_room(input)?;
    Ok((StatusCode::CREATED, Json(room)))
}

pub async fn remove_room(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if db.remove_room(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Room"))
    }
}

/// Create a guest directly inside a room.
pub async fn add_guest_to_room(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(input): Json<CreateGuestInput>,
) -> Result<Json<Room>, ApiError> {
    db.add_guest_to_room(id, input)?
        .map(Json)
        .ok_or(ApiError::NotFound("Room"))
}

/// Move an existing guest into a room.
pub async fn assign_guest(
    State(db): State<Database>,
    Path((id, guest_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Room>, ApiError> {
    db.assign_guest(id, guest_id)?
        .map(Json)
        .ok_or(ApiError::NotFound("Room or guest"))
}

// ============================================================
// Guests
// ============================================================

pub async fn list_guests(
    State(db): State<Database>,
) -> Result<Json<Vec<GuestSummary>>, ApiError> {
    tracing::info!("Fetching all guests");
    Ok(Json(db.list_guest_summaries()?))
}

pub async fn get_guest(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<Guest>, ApiError> {
    db.get_guest(id)?
        .map(Json)
        .ok_or(ApiError::NotFound("Guest"))
}

/// Create a guest, assigned to `room_id` when one is given.
pub async fn create_guest(
    State(db): State<Database>,
    Json(input): Json<CreateGuestInput>,
) -> Result<(StatusCode, Json<Guest>), ApiError> {
    db.create_guest(input)?
        .map(|g| (StatusCode::CREATED, Json(g)))
        .ok_or(ApiError::NotFound("Room"))
}

pub async fn remove_guest(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if db.remove_guest(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Guest"))
    }
}

/// Vacate the guest's room without deleting the guest.
pub async fn detach_guest(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<Guest>, ApiError> {
    db.detach_guest(id)?
        .map(Json)
        .ok_or(ApiError::NotFound("Guest"))
}

/// Query parameters for filtering guests by age. Both bounds are inclusive.
#[derive(Debug, Deserialize)]
pub struct AgeRangeQuery {
    pub start_age: Option<i64>,
    pub end_age: Option<i64>,
}

pub async fn guests_by_age(
    State(db): State<Database>,
    Query(query): Query<AgeRangeQuery>,
) -> Result<Json<Vec<GuestSummary>>, ApiError> {
    let (start, end) = validate_range(query.start_age, query.end_age, "age")?;
    tracing::info!("Fetching guests between ages {} and {}", start, end);
    Ok(Json(db.find_guests_by_age_between(start, end)?))
}

/// Query parameters for filtering guests by occupancy date. Both bounds are
/// inclusive.
#[derive(Debug, Deserialize)]
pub struct OccupancyRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub async fn guests_by_occupancy(
    State(db): State<Database>,
    Query(query): Query<OccupancyRangeQuery>,
) -> Result<Json<Vec<GuestSummary>>, ApiError> {
    let (start, end) = validate_range(query.start_date, query.end_date, "date")?;
    tracing::info!("Fetching guests with occupancy between {} and {}", start, end);
    Ok(Json(db.find_guests_by_occupancy_between(start, end)?))
}

/// Rejects missing or inverted bounds before they reach the database.
fn validate_range<T: PartialOrd + std::fmt::Display>(
    start: Option<T>,
    end: Option<T>,
    what: &str,
) -> Result<(T, T), ApiError> {
    match (start, end) {
        (Some(start), Some(end)) if start <= end => Ok((start, end)),
        (Some(start), Some(end)) => Err(ApiError::InvalidRange(format!(
            "start {what} {start} is after end {what} {end}"
        ))),
        _ => Err(ApiError::InvalidRange(format!(
            "both start and end {what} are required"
        ))),
    }
}

// ============================================================
// Rental contracts
// ============================================================

pub async fn list_contracts(
    State(db): State<Database>,
) -> Result<Json<Vec<RentalContract>>, ApiError> {
    Ok(Json(db.get_all_contracts()?))
}

pub async fn get_contract(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContractWithTransactions>, ApiError> {
    db.get_contract_with_transactions(id)?
        .map(Json)
        .ok_or(ApiError::NotFound("Rental contract"))
}

pub async fn create_contract(
    State(db): State<Database>,
    Json(input): Json<CreateContractInput>,
) -> Result<(StatusCode, Json<RentalContract>), ApiError> {
    tracing::info!("Adding new rental contract");
    db.create_contract(input)?
        .map(|c| (StatusCode::CREATED, Json(c)))
        .ok_or(ApiError::NotFound("Room or guest"))
}

pub async fn delete_contract(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if db.delete_contract(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Rental contract"))
    }
}

pub async fn list_contract_transactions(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PaymentTransaction>>, ApiError> {
    db.get_transactions_by_contract(id)?
        .map(Json)
        .ok_or(ApiError::NotFound("Rental contract"))
}

// ============================================================
// Payment transactions
// ============================================================

pub async fn create_transaction(
    State(db): State<Database>,
    Json(input): Json<CreateTransactionInput>,
) -> Result<(StatusCode, Json<PaymentTransaction>), ApiError> {
    tracing::info!("Adding new payment transaction");
    db.create_transaction(input)?
        .map(|t| (StatusCode::CREATED, Json(t)))
        .ok_or(ApiError::NotFound("Rental contract, room or guest"))
}
