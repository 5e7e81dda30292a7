mod error;
mod handlers;

pub use error::ApiError;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::db::Database;

/// Router with permissive CORS, as used for local development and tests.
pub fn create_router(db: Database) -> Router {
    build_router(db, CorsLayer::permissive())
}

pub fn create_router_with_config(db: Database, config: &Config) -> Router {
    build_router(db, config.cors_layer())
}

fn build_router(db: Database, cors: CorsLayer) -> Router {
    let api = Router::new()
        // Rooms
        .route("/rooms", get(handlers::list_rooms))
        .route("/rooms", post(handlers::create_room))
        .route("/rooms/{id}", get(handlers::get_room))
        .route("/rooms/{id}", delete(handlers::remove_room))
        .route("/rooms/{id}/guests", post(handlers::add_guest_to_room))
        .route("/rooms/{id}/guests/{guest_id}", put(handlers::assign_guest))
        // Guests
        .route("/guests", get(handlers::list_guests))
        .route("/guests", post(handlers::create_guest))
        .route("/guests/age", get(handlers::guests_by_age))
        .route("/guests/occupancy", get(handlers::guests_by_occupancy))
        .route("/guests/{id}", get(handlers::get_guest))
        .route("/guests/{id}", delete(handlers::remove_guest))
        .route("/guests/{id}/room", delete(handlers::detach_guest))
        // Rental contracts
        .route("/contracts", get(handlers::list_contracts))
        .route("/contracts", post(handlers::create_contract))
        .route("/contracts/{id}", get(handlers::get_contract))
        .route("/contracts/{id}", delete(handlers::delete_contract))
        .route("/contracts/{id}/transactions", get(handlers::list_contract_transactions))
        // Payment transactions
        .route("/transactions", post(handlers::create_transaction))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(db)
}
