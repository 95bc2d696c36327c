//! Shared helpers for HTTP-level integration tests.
//!
//! Tests drive the full router (same middleware stack as production) via
//! `tower::ServiceExt::oneshot`. Users and projects are seeded through the
//! repository layer; everything under test goes through the HTTP API.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use waypoint_api::auth::jwt::{issue_token, JwtConfig};
use waypoint_api::auth::password::hash_password;
use waypoint_api::config::ServerConfig;
use waypoint_api::router::build_app_router;
use waypoint_api::state::AppState;
use waypoint_core::roles::{ROLE_ADMIN, ROLE_MEMBER};
use waypoint_db::models::project::{CreateProject, Project};
use waypoint_db::models::user::{CreateUser, User};
use waypoint_db::repositories::{MembershipRepo, ProjectRepo, UserRepo};
use waypoint_events::EventBus;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            expiry_hours: 1,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::new(EventBus::default()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn request(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: &str) -> Response<Body> {
    request(app, Method::GET, uri, Some(token), None).await
}

pub async fn get_unauthed(app: Router, uri: &str) -> Response<Body> {
    request(app, Method::GET, uri, None, None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    request(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_json_unauthed(
    app: Router,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    request(app, Method::POST, uri, None, Some(body)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    request(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response<Body> {
    request(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seeding helpers
// ---------------------------------------------------------------------------

/// A seeded user plus a valid access token for it.
pub struct TestUser {
    pub user: User,
    pub token: String,
}

pub async fn seed_user(pool: &PgPool, email: &str, role: &str) -> TestUser {
    let password_hash = hash_password("password123").unwrap();
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash,
            role: role.to_string(),
        },
    )
    .await
    .unwrap();
    let token = issue_token(user.id, &user.role, &test_config().jwt).unwrap();
    TestUser { user, token }
}

pub async fn seed_member(pool: &PgPool) -> TestUser {
    seed_user(pool, "member@example.com", ROLE_MEMBER).await
}

pub async fn seed_admin(pool: &PgPool) -> TestUser {
    seed_user(pool, "admin@example.com", ROLE_ADMIN).await
}

/// Create a project and make `owner` a member of it.
pub async fn seed_project(pool: &PgPool, owner: &TestUser, name: &str) -> Project {
    let project = ProjectRepo::create(
        pool,
        &CreateProject {
            name: name.to_string(),
            description: None,
        },
    )
    .await
    .unwrap();
    MembershipRepo::add(pool, project.id, owner.user.id)
        .await
        .unwrap();
    project
}

/// Minimal location payload with just the required coordinates.
pub fn point(lat: f64, lng: f64) -> serde_json::Value {
    serde_json::json!({ "latitude": lat, "longitude": lng })
}
