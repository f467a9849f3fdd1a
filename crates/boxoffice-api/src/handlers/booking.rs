//! Hold, confirm, release and cancel handlers. All require a bearer token.

use axum::Json;
use axum::extract::{Path, State};
use validator::Validate;

use boxoffice_core::types::id::{BookingId, EventId};
use boxoffice_service::booking::{BookingView, CancelOutcome, HoldOutcome, MultiHoldOutcome, MyHolds};

use crate::dto::request::{HoldMultipleRequest, HoldRequest, SeatIdsRequest};
use crate::dto::response::{ConfirmResponse, ReleaseResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, parse_id};
use crate::state::AppState;

/// POST /hold
pub async fn hold(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<HoldRequest>,
) -> Result<Json<HoldOutcome>, ApiError> {
    let outcome = state
        .bookings
        .hold(&auth, req.event_id, req.seat_id)
        .await?;
    Ok(Json(outcome))
}

/// POST /hold-multiple
pub async fn hold_multiple(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<HoldMultipleRequest>,
) -> Result<Json<MultiHoldOutcome>, ApiError> {
    let outcome = state
        .bookings
        .hold_multiple(&auth, req.event_id, &req.seat_ids)
        .await?;
    Ok(Json(outcome))
}

/// POST /confirm
pub async fn confirm(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SeatIdsRequest>,
) -> Result<Json<ConfirmResponse>, ApiError> {
    req.validate()?;
    let outcome = state.bookings.confirm(&auth, &req.seat_ids).await?;
    Ok(Json(outcome.into()))
}

/// POST /release
pub async fn release(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SeatIdsRequest>,
) -> Result<Json<ReleaseResponse>, ApiError> {
    req.validate()?;
    let outcome = state.bookings.release(&auth, &req.seat_ids).await?;
    Ok(Json(outcome.into()))
}

/// POST /cancel-booking/{booking_id}
pub async fn cancel_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(booking_id): Path<String>,
) -> Result<Json<CancelOutcome>, ApiError> {
    let booking_id: BookingId = parse_id(&booking_id)?;
    let outcome = state.bookings.cancel_booking(&auth, booking_id).await?;
    Ok(Json(outcome))
}

/// GET /my-holds/{event_id}
pub async fn my_holds(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(event_id): Path<String>,
) -> Result<Json<MyHolds>, ApiError> {
    let event_id: EventId = parse_id(&event_id)?;
    Ok(Json(state.bookings.my_holds(&auth, event_id).await?))
}

/// GET /my-bookings
pub async fn my_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<BookingView>>, ApiError> {
    Ok(Json(state.bookings.my_bookings(&auth).await?))
}
