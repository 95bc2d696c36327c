//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use waypoint_core::types::{DbId, Timestamp};

/// A dashboard user. The role string is one of `waypoint_core::roles`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: Timestamp,
}

/// DTO for inserting a new user. The password is hashed before this point.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub role: String,
}
