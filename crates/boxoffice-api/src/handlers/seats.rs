//! Public seat listing.

use axum::Json;
use axum::extract::{Path, State};

use boxoffice_core::types::id::EventId;
use boxoffice_service::feed::EventSeats;

use crate::error::ApiError;
use crate::extractors::parse_id;
use crate::state::AppState;

/// GET /events/{event_id}/seats/fast
pub async fn event_seats(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<EventSeats>, ApiError> {
    let event_id: EventId = parse_id(&event_id)?;
    Ok(Json(state.feed.event_seats(event_id).await?))
}
