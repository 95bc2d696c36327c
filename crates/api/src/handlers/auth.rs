//! Handlers for the `/auth` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use waypoint_core::error::CoreError;
use waypoint_core::roles::ROLE_MEMBER;
use waypoint_db::models::user::{CreateUser, User};
use waypoint_db::repositories::UserRepo;

use crate::auth::jwt::issue_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Response payload for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/v1/auth/register
///
/// Create a new `member` user. Admin roles are assigned out of band.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<impl IntoResponse> {
    if !input.email.contains('@') {
        return Err(AppError::Core(CoreError::Validation(
            "email must be a valid address".into(),
        )));
    }
    if input.password.len() < 8 {
        return Err(AppError::Core(CoreError::Validation(
            "password must be at least 8 characters".into(),
        )));
    }

    let password_hash = hash_password(&input.password)?;
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email,
            password_hash,
            role: ROLE_MEMBER.to_string(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// POST /api/v1/auth/login
///
/// Exchange credentials for a JWT. The error message is identical for an
/// unknown email and a wrong password.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_email(&state.pool, &input.email).await?;

    let user = match user {
        Some(user) if verify_password(&input.password, &user.password_hash) => user,
        _ => {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid email or password".into(),
            )))
        }
    };

    let token = issue_token(user.id, &user.role, &state.config.jwt)?;
    Ok(Json(DataResponse {
        data: LoginResponse { token, user },
    }))
}
