//! JSON API handlers.
//!
//! The API is read-only: devices are controlled over the WebSocket only.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::ApiError;
use crate::protocol::WireStates;
use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/states", get(states))
}

/// `GET /api/states` — current state of every device.
///
/// # Errors
///
/// Returns `503 Service Unavailable` when the hub has stopped.
pub async fn states(State(state): State<AppState>) -> Result<Json<WireStates>, ApiError> {
    let snapshot = state.hub.snapshot().await?;
    Ok(Json(WireStates::from(&snapshot.states)))
}
