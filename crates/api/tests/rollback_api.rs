//! HTTP-level integration tests for rollback reconciliation.
//!
//! Covers the convergence property (after a project rollback the live set
//! equals the reconstructed state at the target), idempotent re-rollback,
//! tombstone resurrection, and version-ownership checks.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, delete, get, post_json, put_json, seed_member, seed_project,
};
use serde_json::json;
use sqlx::PgPool;
use waypoint_db::repositories::{LocationRepo, LocationVersionRepo};

/// Find a ledger entry id in the project history by operation and,
/// optionally, the location it concerns.
async fn find_version_id(
    app: &axum::Router,
    token: &str,
    project_id: i64,
    operation: &str,
    location_id: Option<i64>,
) -> i64 {
    let json = body_json(
        get(
            app.clone(),
            &format!("/api/v1/projects/{project_id}/history"),
            token,
        )
        .await,
    )
    .await;
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|item| {
            item["version"]["operation"] == operation
                && location_id
                    .is_none_or(|id| item["version"]["location_id"].as_i64() == Some(id))
        })
        .unwrap_or_else(|| panic!("no {operation} entry in history"))["version"]["id"]
        .as_i64()
        .unwrap()
}

/// Build the four-entry acceptance ledger:
/// E1=create A(10,20), E2=create B(11,21), E3=delete A, E4=update B(12,22).
async fn seed_scenario(app: &axum::Router, token: &str, project_id: i64) -> (i64, i64) {
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
async fn test_project_rollback_converges_on_target_state(pool: PgPool) {
    let member = seed_member(&pool).await;
    let project = seed_project(&pool, &member, "Rollback").await;
    let app = build_test_app(pool.clone());
    let (a, b) = seed_scenario(&app, &member.token, project.id).await;

    // Roll the project back to E3 (the delete of A).
    let e3 = find_version_id(&app, &member.token, project.id, "delete", None).await;
    let response = post_json(
        app.clone(),
        &format!("/api/v1/projects/{}/rollback", project.id),
        &member.token,
        json!({ "version_id": e3 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["restored"], 1);
    assert_eq!(json["data"]["deleted"], 0);
    assert_eq!(json["data"]["recreated"], 0);

    // Live set is exactly {B at (11, 21)}; A stays tombstoned.
    let live = LocationRepo::list_live(&pool, project.id).await.unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].id, b);
    assert_eq!(live[0].latitude, 11.0);
    assert_eq!(live[0].longitude, 21.0);

    let row_a = LocationRepo::find_any_by_id(&pool, a).await.unwrap().unwrap();
    assert!(row_a.deleted_at.is_some());

    // The rollback is a new commit: one rollback_project entry appended.
    let ledger = LocationVersionRepo::list_for_project(&pool, project.id)
        .await
        .unwrap();
    assert_eq!(ledger.len(), 5);
    assert_eq!(ledger[4].operation, "rollback_project");
    assert_eq!(ledger[4].user_id, Some(member.user.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_repeated_rollback_is_convergent_but_still_appends(pool: PgPool) {
    let member = seed_member(&pool).await;
    let project = seed_project(&pool, &member, "Idempotence").await;
    let app = build_test_app(pool.clone());
    seed_scenario(&app, &member.token, project.id).await;

    let e3 = find_version_id(&app, &member.token, project.id, "delete", None).await;
    let uri = format!("/api/v1/projects/{}/rollback", project.id);

    let first = post_json(
        app.clone(),
        &uri,
        &member.token,
        json!({ "version_id": e3 }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);
    let live_after_first = LocationRepo::list_live(&pool, project.id).await.unwrap();

    let second = post_json(app, &uri, &member.token, json!({ "version_id": e3 })).await;
    assert_eq!(second.status(), StatusCode::OK);
    let live_after_second = LocationRepo::list_live(&pool, project.id).await.unwrap();

    // The live set is unchanged by the second run...
    assert_eq!(live_after_first.len(), live_after_second.len());
    for (x, y) in live_after_first.iter().zip(live_after_second.iter()) {
        assert_eq!(x.id, y.id);
        assert_eq!(x.latitude, y.latitude);
        assert_eq!(x.longitude, y.longitude);
    }

    // ...but the ledger grew by one entry per run (4 edits + 2 rollbacks).
    let ledger = LocationVersionRepo::list_for_project(&pool, project.id)
        .await
        .unwrap();
    assert_eq!(ledger.len(), 6);
    assert_eq!(ledger[5].operation, "rollback_project");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_rollback_resurrects_tombstoned_location(pool: PgPool) {
    let member = seed_member(&pool).await;
    let project = seed_project(&pool, &member, "Resurrection").await;
    let app = build_test_app(pool.clone());
    let uri = format!("/api/v1/projects/{}/locations", project.id);

    let a = body_json(
        post_json(
            app.clone(),
            &uri,
            &member.token,
            json!({ "latitude": 50, "longitude": 60, "name": "Lost site" }),
        )
        .await,
    )
    .await["data"]["id"]
        .as_i64()
        .unwrap();
    delete(app.clone(), &format!("{uri}/{a}"), &member.token).await;

    // Roll back to the create entry: A must come back from its tombstone.
    let create_id = find_version_id(&app, &member.token, project.id, "create", Some(a)).await;
    let response = post_json(
        app,
        &format!("/api/v1/projects/{}/rollback", project.id),
        &member.token,
        json!({ "version_id": create_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let live = LocationRepo::list_live(&pool, project.id).await.unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].id, a);
    assert_eq!(live[0].name.as_deref(), Some("Lost site"));
    assert!(live[0].deleted_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rollback_to_delete_entry_leaves_live_set_empty(pool: PgPool) {
    let member = seed_member(&pool).await;
    let project = seed_project(&pool, &member, "Empty target").await;
    let app = build_test_app(pool.clone());
    let uri = format!("/api/v1/projects/{}/locations", project.id);

    let a = body_json(
        post_json(app.clone(), &uri, &member.token, json!({ "latitude": 1, "longitude": 2 }))
            .await,
    )
    .await["data"]["id"]
        .as_i64()
        .unwrap();
    delete(app.clone(), &format!("{uri}/{a}"), &member.token).await;

    let delete_id = find_version_id(&app, &member.token, project.id, "delete", Some(a)).await;
    let response = post_json(
        app,
        &format!("/api/v1/projects/{}/rollback", project.id),
        &member.token,
        json!({ "version_id": delete_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let live = LocationRepo::list_live(&pool, project.id).await.unwrap();
    assert!(live.is_empty());

    // The rollback is still recorded even though nothing is alive.
    let ledger = LocationVersionRepo::list_for_project(&pool, project.id)
        .await
        .unwrap();
    assert_eq!(ledger.len(), 3);
    assert_eq!(ledger[2].operation, "rollback_project");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_rollback_rejects_foreign_version(pool: PgPool) {
    let member = seed_member(&pool).await;
    let project_one = seed_project(&pool, &member, "One").await;
    let project_two = seed_project(&pool, &member, "Two").await;
    let app = build_test_app(pool);

    // A version that belongs to project two...
    post_json(
        app.clone(),
        &format!("/api/v1/projects/{}/locations", project_two.id),
        &member.token,
        json!({ "latitude": 1, "longitude": 2 }),
    )
    .await;
    let foreign =
        find_version_id(&app, &member.token, project_two.id, "create", None).await;

    // ...cannot be a rollback target for project one.
    let response = post_json(
        app,
        &format!("/api/v1/projects/{}/rollback", project_one.id),
        &member.token,
        json!({ "version_id": foreign }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_location_rollback_reverts_one_location(pool: PgPool) {
    let member = seed_member(&pool).await;
    let project = seed_project(&pool, &member, "Point rollback").await;
    let app = build_test_app(pool.clone());
    let (_a, b) = seed_scenario(&app, &member.token, project.id).await;

    // Revert B to its create entry (11, 21).
    let create_b = find_version_id(&app, &member.token, project.id, "create", Some(b)).await;
    let response = post_json(
        app,
        &format!(
            "/api/v1/projects/{}/locations/{}/rollback",
            project.id, b
        ),
        &member.token,
        json!({ "version_id": create_b }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["latitude"], 11.0);
    assert_eq!(json["data"]["longitude"], 21.0);

    // Revert-as-new-commit: the ledger grew forward with a rollback entry.
    let ledger = LocationVersionRepo::list_for_project(&pool, project.id)
        .await
        .unwrap();
    assert_eq!(ledger.len(), 5);
    assert_eq!(ledger[4].operation, "rollback");
    assert_eq!(ledger[4].location_id, b);
    assert_eq!(ledger[4].latitude, 11.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_location_rollback_undeletes_its_target(pool: PgPool) {
    let member = seed_member(&pool).await;
    let project = seed_project(&pool, &member, "Undelete").await;
    let app = build_test_app(pool.clone());
    let uri = format!("/api/v1/projects/{}/locations", project.id);

    let a = body_json(
        post_json(
            app.clone(),
            &uri,
            &member.token,
            json!({ "latitude": 3, "longitude": 4, "name": "Flickering" }),
        )
        .await,
    )
    .await["data"]["id"]
        .as_i64()
        .unwrap();
    delete(app.clone(), &format!("{uri}/{a}"), &member.token).await;

    let create_a = find_version_id(&app, &member.token, project.id, "create", Some(a)).await;
    let response = post_json(
        app.clone(),
        &format!("{uri}/{a}/rollback"),
        &member.token,
        json!({ "version_id": create_a }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let live = LocationRepo::list_live(&pool, project.id).await.unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].id, a);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_location_rollback_rejects_other_locations_version(pool: PgPool) {
    let member = seed_member(&pool).await;
    let project = seed_project(&pool, &member, "Wrong target").await;
    let app = build_test_app(pool);
    let (a, b) = seed_scenario(&app, &member.token, project.id).await;

    // A's create entry is not a valid target for B.
    let create_a = find_version_id(&app, &member.token, project.id, "create", Some(a)).await;
    let response = post_json(
        app,
        &format!(
            "/api/v1/projects/{}/locations/{}/rollback",
            project.id, b
        ),
        &member.token,
        json!({ "version_id": create_a }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
