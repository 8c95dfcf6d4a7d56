//! tests for the task flows: authored creates, the audit trail, phase and
//! priority transitions and the administrative delete gate.

mod common;

use axum::http::StatusCode;
use sea_orm::{ColumnTrait, Condition};
use serde_json::{Value, json};

use common::{admin_token, member_token, request, spawn};
use opsdesk_db::entity::task_histories;

async fn create_task(ctx: &common::TestApp, token: &str, name: &str) -> Value {
    let (status, body) = request(
        &ctx.app,
        "POST",
        "/api/tasks",
        Some(token),
        Some(json!({
            "name": name,
            "description": "integration test task",
            "priority": 1,
            "phase": 1,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

async fn history_rows(ctx: &common::TestApp, task_id: i64) -> Vec<task_histories::Model> {
    ctx.db
        .find_all::<task_histories::Entity>(
            Condition::all().add(task_histories::Column::TaskId.eq(task_id)),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn create_records_the_author_and_the_initial_phase() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    let task = create_task(&ctx, &token, "Wire the audit trail").await;
    // the author is the acting principal, not client input
    assert_eq!(task["authorId"], 1);

    let history = history_rows(&ctx, task["id"].as_i64().unwrap()).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].from_phase_id, None);
    assert_eq!(history[0].to_phase_id, 1);
    assert_eq!(history[0].changed_by_id, 1);
}

#[tokio::test]
async fn author_cannot_be_spoofed_on_create() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    let (status, body) = request(
        &ctx.app,
        "POST",
        "/api/tasks",
        Some(&token),
        Some(json!({
            "name": "Spoofed",
            "author": 999,
            "priority": 1,
            "phase": 1,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["authorId"], 1);
}

#[tokio::test]
async fn get_one_includes_every_parent() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    let task = create_task(&ctx, &token, "Joined read").await;
    let id = task["id"].as_i64().unwrap();

    let (status, body) =
        request(&ctx.app, "GET", &format!("/api/tasks/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["priority"]["name"], "low");
    assert_eq!(body["phase"]["name"], "to_do");
    assert_eq!(body["author"]["id"], 1);
    // round-trip via the list filter
    let (_, listing) = request(
        &ctx.app,
        "GET",
        &format!("/api/tasks?priority=1"),
        Some(&token),
        None,
    )
    .await;
    assert!(
        listing["data"]
            .as_array()
            .unwrap()
            .iter()
            .any(|row| row["id"].as_i64() == Some(id))
    );
}

#[tokio::test]
async fn phase_transition_accepts_names_audits_and_rejects_no_ops() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    let task = create_task(&ctx, &token, "Move me").await;
    let id = task["id"].as_i64().unwrap();

    let (status, body) = request(
        &ctx.app,
        "PATCH",
        "/api/tasks/phase",
        Some(&token),
        Some(json!({"id": id, "phase": "in_progress"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["phaseId"], 2);

    // idempotence: the same target value is refused the second time
    let (status, body) = request(
        &ctx.app,
        "PATCH",
        "/api/tasks/phase",
        Some(&token),
        Some(json!({"id": id, "phase": "in_progress"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Phase is unchanged.");

    // exactly one audit row per successful change (plus the create row)
    let history = history_rows(&ctx, id).await;
    assert_eq!(history.len(), 2);
    let transition = history.iter().find(|h| h.from_phase_id.is_some()).unwrap();
    assert_eq!(transition.from_phase_id, Some(1));
    assert_eq!(transition.to_phase_id, 2);
}

#[tokio::test]
async fn unknown_phase_names_are_rejected() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;
    let task = create_task(&ctx, &token, "Nowhere to go").await;

    let (status, body) = request(
        &ctx.app,
        "PATCH",
        "/api/tasks/phase",
        Some(&token),
        Some(json!({"id": task["id"], "phase": "warp_speed"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Phase not found"));
}

#[tokio::test]
async fn priority_transition_works_without_an_audit_row() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    let task = create_task(&ctx, &token, "Bump me").await;
    let id = task["id"].as_i64().unwrap();

    let (status, body) = request(
        &ctx.app,
        "PATCH",
        "/api/tasks/priority",
        Some(&token),
        Some(json!({"id": id, "priority": "high"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["priorityId"], 3);

    // only the create entry exists; priority changes are not audited
    assert_eq!(history_rows(&ctx, id).await.len(), 1);

    let (status, body) = request(
        &ctx.app,
        "PATCH",
        "/api/tasks/priority",
        Some(&token),
        Some(json!({"id": id, "priority": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Priority is unchanged.");
}

#[tokio::test]
async fn update_preserves_the_original_author() {
    let ctx = spawn().await;
    let admin = admin_token(&ctx.app).await;
    let task = create_task(&ctx, &admin, "Keep my author").await;
    let id = task["id"].as_i64().unwrap();

    let (status, body) = request(
        &ctx.app,
        "PATCH",
        "/api/tasks",
        Some(&admin),
        Some(json!({
            "id": id,
            "name": "Renamed task",
            "author": 424242,
            "priority": 2,
            "phase": 1,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["name"], "Renamed task");
    assert_eq!(body["authorId"], 1);
    assert_eq!(body["priorityId"], 2);
}

#[tokio::test]
async fn task_deletion_is_admin_only() {
    let ctx = spawn().await;
    let admin = admin_token(&ctx.app).await;
    let member = member_token(&ctx.app, "worker@example.com").await;

    let task = create_task(&ctx, &admin, "Deletable").await;
    let id = task["id"].as_i64().unwrap();

    let (status, body) = request(
        &ctx.app,
        "DELETE",
        "/api/tasks",
        Some(&member),
        Some(json!({"id": id})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].as_str().unwrap().contains("rights to remove"));

    let (status, _) = request(
        &ctx.app,
        "DELETE",
        "/api/tasks",
        Some(&admin),
        Some(json!({"id": id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
        request(&ctx.app, "GET", &format!("/api/tasks/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn task_histories_are_listable_and_filtered_by_task() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    let a = create_task(&ctx, &token, "First").await;
    create_task(&ctx, &token, "Second").await;
    let a_id = a["id"].as_i64().unwrap();

    let (status, body) = request(
        &ctx.app,
        "GET",
        &format!("/api/taskhistories?task={a_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["totalData"], 1);
    assert_eq!(body["data"][0]["taskId"], json!(a_id));
    assert!(body["data"][0]["task"]["name"].is_string());

    // the task filter is mandatory when present-but-empty
    let (status, _) = request(
        &ctx.app,
        "GET",
        "/api/taskhistories?task=",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, all) = request(&ctx.app, "GET", "/api/taskhistories", Some(&token), None).await;
    assert_eq!(all["totalData"], 2);
}
