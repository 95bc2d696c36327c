//! Handlers for the `/projects` resource, plus the project access guard
//! shared by the location and history handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use waypoint_core::error::CoreError;
use waypoint_core::types::DbId;
use waypoint_db::models::project::{CreateProject, Project};
use waypoint_db::repositories::{MembershipRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Resolve a project and verify the caller may act on it.
///
/// Admins can access every project; members only those they belong to.
/// Every location/ledger operation passes through here before anything
/// touches the store.
pub async fn authorize_project(
    pool: &sqlx::PgPool,
    auth: &AuthUser,
    project_id: DbId,
) -> AppResult<Project> {
    let project = ProjectRepo::find_by_id(pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    if !auth.is_admin() && !MembershipRepo::is_member(pool, project_id, auth.user_id).await? {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not a member of this project".into(),
        )));
    }

    Ok(project)
}

/// POST /api/v1/projects
///
/// Create a project; the creator becomes its first member.
pub async fn create_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name must not be empty".into(),
        )));
    }

    let mut tx = state.pool.begin().await?;
    let project = ProjectRepo::create(&mut *tx, &input).await?;
    MembershipRepo::add(&mut *tx, project.id, auth.user_id).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects
///
/// List projects visible to the caller: all of them for admins, owned
/// memberships for everyone else.
pub async fn list_projects(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let projects = if auth.is_admin() {
        ProjectRepo::list_all(&state.pool).await?
    } else {
        ProjectRepo::list_for_user(&state.pool, auth.user_id).await?
    };
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{project_id}
pub async fn get_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = authorize_project(&state.pool, &auth, project_id).await?;
    Ok(Json(DataResponse { data: project }))
}
