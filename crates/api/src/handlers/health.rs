//! Liveness handler.

use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /health
///
/// Returns 200 with `{"status": "ok"}` when the database is reachable.
pub async fn health(State(state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    waypoint_db::health_check(&state.pool).await?;
    Ok(Json(json!({ "status": "ok" })))
}
