//! HTTP-level integration tests for the project history endpoint.
//!
//! History items are reconstructed by replaying the ledger and are
//! presented newest first: index 0 reflects the current live set.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, delete, get, post_json, put_json, seed_member, seed_project};
use serde_json::json;
use sqlx::PgPool;

/// Build the four-entry acceptance ledger through the API:
/// E1=create A(10,20), E2=create B(11,21), E3=delete A, E4=update B(12,22).
/// Returns `(location_a, location_b)`.
async fn seed_scenario(
    app: &axum::Router,
    token: &str,
    project_id: i64,
) -> (i64, i64) {
    let uri = format!("/api/v1/projects/{project_id}/locations");

    let a = body_json(
        post_json(
            app.clone(),
            &uri,
            token,
            json!({ "latitude": 10, "longitude": 20, "name": "A" }),
        )
        .await,
    )
    .await["data"]["id"]
        .as_i64()
        .unwrap();

    let b = body_json(
        post_json(
            app.clone(),
            &uri,
            token,
            json!({ "latitude": 11, "longitude": 21, "name": "B" }),
        )
        .await,
    )
    .await["data"]["id"]
        .as_i64()
        .unwrap();

    delete(app.clone(), &format!("{uri}/{a}"), token).await;

    put_json(
        app.clone(),
        &format!("{uri}/{b}"),
        token,
        json!({ "latitude": 12, "longitude": 22, "name": "B" }),
    )
    .await;

    (a, b)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_history(pool: PgPool) {
    let member = seed_member(&pool).await;
    let project = seed_project(&pool, &member, "No history").await;
    let app = build_test_app(pool);

    let response = get(
        app,
        &format!("/api/v1/projects/{}/history", project.id),
        &member.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_is_newest_first_with_full_snapshots(pool: PgPool) {
    let member = seed_member(&pool).await;
    let project = seed_project(&pool, &member, "Timeline").await;
    let app = build_test_app(pool);
    let (a, b) = seed_scenario(&app, &member.token, project.id).await;

    let response = get(
        app,
        &format!("/api/v1/projects/{}/history", project.id),
        &member.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 4);

    // Index 0 is the most recent entry (E4) and mirrors the live set.
    assert_eq!(items[0]["version"]["operation"], "update");
    assert_eq!(items[0]["version"]["location_id"].as_i64(), Some(b));
    let live = items[0]["locations"].as_array().unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0]["location_id"].as_i64(), Some(b));
    assert_eq!(live[0]["latitude"], 12.0);

    // E3: after A's deletion, only B (still at its original coordinates).
    assert_eq!(items[1]["version"]["operation"], "delete");
    let after_delete = items[1]["locations"].as_array().unwrap();
    assert_eq!(after_delete.len(), 1);
    assert_eq!(after_delete[0]["location_id"].as_i64(), Some(b));
    assert_eq!(after_delete[0]["latitude"], 11.0);

    // E2: both locations alive.
    assert_eq!(items[2]["locations"].as_array().unwrap().len(), 2);

    // E1 (oldest, last): only A, as created.
    assert_eq!(items[3]["version"]["operation"], "create");
    let oldest = items[3]["locations"].as_array().unwrap();
    assert_eq!(oldest.len(), 1);
    assert_eq!(oldest[0]["location_id"].as_i64(), Some(a));
    assert_eq!(oldest[0]["latitude"], 10.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_limit_keeps_newest(pool: PgPool) {
    let member = seed_member(&pool).await;
    let project = seed_project(&pool, &member, "Limited").await;
    let app = build_test_app(pool);
    seed_scenario(&app, &member.token, project.id).await;

    let response = get(
        app,
        &format!("/api/v1/projects/{}/history?limit=2", project.id),
        &member.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["version"]["operation"], "update");
    assert_eq!(items[1]["version"]["operation"], "delete");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_replays_deterministically(pool: PgPool) {
    let member = seed_member(&pool).await;
    let project = seed_project(&pool, &member, "Determinism").await;
    let app = build_test_app(pool);
    seed_scenario(&app, &member.token, project.id).await;

    let uri = format!("/api/v1/projects/{}/history", project.id);
    let first = body_json(get(app.clone(), &uri, &member.token).await).await;
    let second = body_json(get(app, &uri, &member.token).await).await;
    assert_eq!(first, second);
}
