//! Route definitions for the `/projects` resource, including version
//! history and whole-project rollback.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{history, projects};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET  /                          -> list_projects
/// POST /                          -> create_project
/// GET  /{project_id}              -> get_project
/// GET  /{project_id}/history      -> project_history  (?limit=)
/// POST /{project_id}/rollback     -> rollback_project
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list_projects).post(projects::create_project))
        .route("/{project_id}", get(projects::get_project))
        .route("/{project_id}/history", get(history::project_history))
        .route("/{project_id}/rollback", post(history::rollback_project))
}
