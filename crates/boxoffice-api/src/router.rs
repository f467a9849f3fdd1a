//! Route definitions for the BoxOffice HTTP API.
//!
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::Router;
use axum::routing::{get, post};

use crate::handlers;
use crate::state::AppState;

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(booking_routes())
        .merge(seat_routes())
        .merge(health_routes())
        .route("/ws/events/{event_id}", get(handlers::ws::ws_upgrade))
        .with_state(state)
}

/// Hold, confirm, release, cancel and the caller's own listings
fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/hold", post(handlers::booking::hold))
        .route("/hold-multiple", post(handlers::booking::hold_multiple))
        .route("/confirm", post(handlers::booking::confirm))
        .route("/release", post(handlers::booking::release))
        .route(
            "/cancel-booking/{booking_id}",
            post(handlers::booking::cancel_booking),
        )
        .route("/my-holds/{event_id}", get(handlers::booking::my_holds))
        .route("/my-bookings", get(handlers::booking::my_bookings))
}

/// Public seat listing
fn seat_routes() -> Router<AppState> {
    Router::new().route(
        "/events/{event_id}/seats/fast",
        get(handlers::seats::event_seats),
    )
}

fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
