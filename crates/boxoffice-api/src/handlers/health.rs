//! Health check handlers.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use boxoffice_core::traits::lock::LockCoordinator;

use crate::dto::response::{DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

const SERVICE_NAME: &str = "booking";

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

/// GET /health/detailed
pub async fn health_detailed(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    let lock_ok = match state.locks.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            warn!(error = %e, "Lock coordinator health check failed");
            false
        }
    };

    Json(DetailedHealthResponse {
        status: if lock_ok { "healthy" } else { "degraded" }.to_string(),
        service: SERVICE_NAME.to_string(),
        lock_coordinator: if lock_ok { "connected" } else { "unreachable" }.to_string(),
        observed_events: state.hub.event_count(),
    })
}
