//! Handlers for project version history and rollback.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use waypoint_core::timeline::{self, SnapshotLocation};
use waypoint_core::types::DbId;
use waypoint_db::models::location_version::{to_records, LocationVersion};
use waypoint_db::repositories::LocationVersionRepo;
use waypoint_events::{PlatformEvent, EVENT_LOCATION_ROLLED_BACK, EVENT_PROJECT_ROLLED_BACK};

use crate::engine::rollback;
use crate::error::AppResult;
use crate::handlers::projects::authorize_project;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Cap on the number of snapshots returned (newest kept). Replay
    /// itself always folds the full ledger; this only bounds the response.
    pub limit: Option<usize>,
}

/// One step of a project's history: the ledger entry plus the full set of
/// locations that were alive immediately after it.
#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub version: LocationVersion,
    pub locations: Vec<SnapshotLocation>,
}

/// Request body for both rollback endpoints.
#[derive(Debug, Deserialize)]
pub struct RollbackInput {
    pub version_id: DbId,
}

/// GET /api/v1/projects/{project_id}/history
///
/// The project's version history, newest first: index 0 reflects the
/// current live set.
pub async fn project_history(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(params): Query<HistoryQuery>,
) -> AppResult<impl IntoResponse> {
    authorize_project(&state.pool, &auth, project_id).await?;

    let entries = LocationVersionRepo::list_for_project(&state.pool, project_id).await?;
    let records = to_records(&entries)?;
    let snapshots = timeline::reconstruct(&records, None)?;

    // One snapshot per entry, in replay order; pair them back up and
    // present newest-first.
    let mut items: Vec<HistoryItem> = entries
        .into_iter()
        .zip(snapshots)
        .map(|(version, snapshot)| HistoryItem {
            version,
            locations: snapshot.locations_after,
        })
        .collect();
    items.reverse();

    if let Some(limit) = params.limit {
        items.truncate(limit);
    }

    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/projects/{project_id}/locations/{location_id}/rollback
///
/// Revert one location to the state captured by `version_id`. The revert
/// is a new commit: one `rollback` ledger entry is appended.
pub async fn rollback_location(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_id, location_id)): Path<(DbId, DbId)>,
    Json(input): Json<RollbackInput>,
) -> AppResult<impl IntoResponse> {
    authorize_project(&state.pool, &auth, project_id).await?;

    let (location, _version) = rollback::rollback_location(
        &state.pool,
        auth.user_id,
        project_id,
        location_id,
        input.version_id,
    )
    .await?;

    state.event_bus.publish(
        PlatformEvent::new(EVENT_LOCATION_ROLLED_BACK, project_id)
            .with_entity(location.id)
            .with_actor(auth.user_id),
    );

    Ok(Json(DataResponse { data: location }))
}

/// POST /api/v1/projects/{project_id}/rollback
///
/// Restore the whole project to the state immediately after `version_id`.
/// Converges the live set atomically and appends one `rollback_project`
/// ledger entry.
pub async fn rollback_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<RollbackInput>,
) -> AppResult<impl IntoResponse> {
    authorize_project(&state.pool, &auth, project_id).await?;

    let outcome =
        rollback::rollback_project(&state.pool, auth.user_id, project_id, input.version_id)
            .await?;

    state.event_bus.publish(
        PlatformEvent::new(EVENT_PROJECT_ROLLED_BACK, project_id)
            .with_actor(auth.user_id)
            .with_payload(json!({
                "version_id": input.version_id,
                "restored": outcome.restored,
                "recreated": outcome.recreated,
                "deleted": outcome.deleted,
            })),
    );

    Ok(Json(DataResponse { data: outcome }))
}
