//! Route definitions for the locations resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{history, locations};
use crate::state::AppState;

/// Routes mounted at `/projects/{project_id}/locations`.
///
/// ```text
/// GET    /                            -> list_locations
/// POST   /                            -> create_location
/// PUT    /{location_id}               -> update_location
/// DELETE /{location_id}               -> delete_location
/// POST   /{location_id}/rollback      -> rollback_location
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(locations::list_locations).post(locations::create_location),
        )
        .route(
            "/{location_id}",
            put(locations::update_location).delete(locations::delete_location),
        )
        .route("/{location_id}/rollback", post(history::rollback_location))
}
