pub mod auth;
pub mod health;
pub mod locations;
pub mod projects;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                    register (public)
/// /auth/login                                       login (public)
///
/// /projects                                         list, create
/// /projects/{project_id}                            get
/// /projects/{project_id}/history                    version history, newest first
/// /projects/{project_id}/rollback                   whole-project rollback (POST)
///
/// /projects/{project_id}/locations                  list, create
/// /projects/{project_id}/locations/{location_id}    update (PUT), soft delete
/// /projects/{project_id}/locations/{location_id}/rollback
///                                                   single-location rollback (POST)
/// ```
///
/// Everything except `/auth/*` requires a Bearer token and project access
/// (admin role or membership).
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/projects", projects::router())
        .nest("/projects/{project_id}/locations", locations::router())
}
