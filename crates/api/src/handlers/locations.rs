//! Handlers for the `/projects/{project_id}/locations` resource.
//!
//! Each write handler validates and normalizes client input first, then
//! runs one paired (store mutation + ledger append) transaction through
//! the engine, and finally publishes a post-commit event.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use waypoint_core::error::CoreError;
use waypoint_core::geometry::{coerce_f64, normalize_boundary, GeoPoint};
use waypoint_core::timeline::LocationAttrs;
use waypoint_core::types::DbId;
use waypoint_db::models::location::CreateLocation;
use waypoint_db::repositories::LocationRepo;
use waypoint_events::{
    PlatformEvent, EVENT_LOCATION_CREATED, EVENT_LOCATION_DELETED, EVENT_LOCATION_UPDATED,
};

use crate::engine::writes;
use crate::error::{AppError, AppResult};
use crate::handlers::projects::authorize_project;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for creating or fully overwriting a location.
///
/// Coordinates arrive as raw JSON so numeric strings coerce the same way
/// boundary points do; a missing coordinate defaults to null and is
/// rejected by validation with the field named.
#[derive(Debug, Deserialize)]
pub struct LocationInput {
    #[serde(default)]
    pub latitude: serde_json::Value,
    #[serde(default)]
    pub longitude: serde_json::Value,
    pub label: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub boundary: Option<serde_json::Value>,
}

impl LocationInput {
    /// Validate the input and produce the canonical attribute tuple.
    ///
    /// Rejects non-numeric coordinates and a boundary that is neither
    /// null nor an array; individual unparseable boundary points are
    /// dropped by the normalizer, and an empty result means no boundary.
    fn into_attrs(self) -> AppResult<LocationAttrs> {
        let latitude = coerce_f64(&self.latitude).ok_or(AppError::Core(CoreError::Validation(
            "latitude must be numeric".into(),
        )))?;
        let longitude = coerce_f64(&self.longitude).ok_or(AppError::Core(
            CoreError::Validation("longitude must be numeric".into()),
        ))?;

        let boundary: Option<Vec<GeoPoint>> = match &self.boundary {
            None => None,
            Some(raw) if raw.is_null() || raw.is_array() => normalize_boundary(raw),
            Some(_) => {
                return Err(AppError::Core(CoreError::Validation(
                    "boundary must be an array of points".into(),
                )))
            }
        };

        Ok(LocationAttrs {
            latitude,
            longitude,
            label: self.label,
            name: self.name,
            description: self.description,
            boundary,
        })
    }
}

/// GET /api/v1/projects/{project_id}/locations
///
/// List the project's live (non-deleted) locations.
pub async fn list_locations(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    authorize_project(&state.pool, &auth, project_id).await?;
    let locations = LocationRepo::list_live(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: locations }))
}

/// POST /api/v1/projects/{project_id}/locations
///
/// Create a location. Returns 201 with the created row; the paired
/// `create` ledger entry is written in the same transaction.
pub async fn create_location(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<LocationInput>,
) -> AppResult<impl IntoResponse> {
    authorize_project(&state.pool, &auth, project_id).await?;
    let attrs = input.into_attrs()?;

    let (location, _version) = writes::create_location(
        &state.pool,
        auth.user_id,
        &CreateLocation {
            project_id,
            latitude: attrs.latitude,
            longitude: attrs.longitude,
            label: attrs.label,
            name: attrs.name,
            description: attrs.description,
            boundary: attrs.boundary,
        },
    )
    .await?;

    state.event_bus.publish(
        PlatformEvent::new(EVENT_LOCATION_CREATED, project_id)
            .with_entity(location.id)
            .with_actor(auth.user_id),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: location })))
}

/// PUT /api/v1/projects/{project_id}/locations/{location_id}
///
/// Fully overwrite a live location's attributes. The paired `update`
/// ledger entry is written in the same transaction.
pub async fn update_location(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_id, location_id)): Path<(DbId, DbId)>,
    Json(input): Json<LocationInput>,
) -> AppResult<impl IntoResponse> {
    authorize_project(&state.pool, &auth, project_id).await?;
    let attrs = input.into_attrs()?;

    let (location, _version) =
        writes::update_location(&state.pool, auth.user_id, project_id, location_id, &attrs)
            .await?;

    state.event_bus.publish(
        PlatformEvent::new(EVENT_LOCATION_UPDATED, project_id)
            .with_entity(location.id)
            .with_actor(auth.user_id),
    );

    Ok(Json(DataResponse { data: location }))
}

/// DELETE /api/v1/projects/{project_id}/locations/{location_id}
///
/// Soft-delete a location. The paired `delete` ledger entry snapshots the
/// pre-deletion attributes. Returns 204.
pub async fn delete_location(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_id, location_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    authorize_project(&state.pool, &auth, project_id).await?;

    writes::soft_delete_location(&state.pool, auth.user_id, project_id, location_id).await?;

    state.event_bus.publish(
        PlatformEvent::new(EVENT_LOCATION_DELETED, project_id)
            .with_entity(location_id)
            .with_actor(auth.user_id),
    );

    Ok(StatusCode::NO_CONTENT)
}
