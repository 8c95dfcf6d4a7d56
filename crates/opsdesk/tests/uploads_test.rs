//! tests for file-field handling: multipart storage, replacement diffing,
//! explicit clearing and the no-orphans guarantee on validation failure.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{admin_token, multipart_request, request, spawn, stored_files};

#[tokio::test]
async fn register_with_a_photo_stores_the_upload() {
    let ctx = spawn().await;

    let (status, body) = multipart_request(
        &ctx.app,
        "POST",
        "/api/auth/register",
        None,
        &[
            ("name", None, "Pic User"),
            ("email", None, "pic@example.com"),
            ("password", None, "picture123"),
            ("phone", None, "+6200000009"),
            ("photo", Some("me.png"), "fake-png-bytes"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let photo = body["photo"].as_str().unwrap();
    assert!(photo.contains("images"));
    assert!(std::path::Path::new(photo).exists());
    assert_eq!(stored_files(&ctx.upload_root).len(), 1);
}

#[tokio::test]
async fn failed_validation_leaves_no_orphaned_uploads() {
    let ctx = spawn().await;

    // phone is required; the stored photo must be cleaned up again
    let (status, _) = multipart_request(
        &ctx.app,
        "POST",
        "/api/auth/register",
        None,
        &[
            ("name", None, "No Phone"),
            ("email", None, "nophone@example.com"),
            ("password", None, "picture123"),
            ("photo", Some("me.png"), "fake-png-bytes"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(stored_files(&ctx.upload_root).is_empty());
}

#[tokio::test]
async fn replacing_a_task_image_removes_the_old_file() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    let (status, task) = multipart_request(
        &ctx.app,
        "POST",
        "/api/tasks",
        Some(&token),
        &[
            ("name", None, "Illustrated task"),
            ("priority", None, "1"),
            ("phase", None, "1"),
            ("image", Some("before.png"), "old-bytes"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{task}");
    let old_path = task["image"].as_str().unwrap().to_string();
    assert!(std::path::Path::new(&old_path).exists());

    let (status, updated) = multipart_request(
        &ctx.app,
        "PATCH",
        "/api/tasks",
        Some(&token),
        &[
            ("id", None, &task["id"].to_string()),
            ("name", None, "Illustrated task"),
            ("priority", None, "1"),
            ("phase", None, "1"),
            ("image", Some("after.png"), "new-bytes"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    let new_path = updated["image"].as_str().unwrap();
    assert_ne!(new_path, old_path);
    assert!(std::path::Path::new(new_path).exists());
    // stale files are removed only after the new state persisted
    assert!(!std::path::Path::new(&old_path).exists());
}

#[tokio::test]
async fn sending_an_explicit_empty_value_clears_the_stored_file() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    let (_, task) = multipart_request(
        &ctx.app,
        "POST",
        "/api/tasks",
        Some(&token),
        &[
            ("name", None, "Clearable"),
            ("priority", None, "1"),
            ("phase", None, "1"),
            ("image", Some("pic.png"), "bytes"),
        ],
    )
    .await;
    let old_path = task["image"].as_str().unwrap().to_string();

    let (status, updated) = request(
        &ctx.app,
        "PATCH",
        "/api/tasks",
        Some(&token),
        Some(json!({
            "id": task["id"],
            "name": "Clearable",
            "priority": 1,
            "phase": 1,
            "image": "",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert!(updated["image"].is_null());
    assert!(!std::path::Path::new(&old_path).exists());
}

#[tokio::test]
async fn deleting_a_row_removes_its_stored_files() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    let (_, task) = multipart_request(
        &ctx.app,
        "POST",
        "/api/tasks",
        Some(&token),
        &[
            ("name", None, "Short lived"),
            ("priority", None, "1"),
            ("phase", None, "1"),
            ("image", Some("pic.png"), "bytes"),
            ("document", Some("spec.pdf"), "doc-bytes"),
        ],
    )
    .await;
    assert_eq!(stored_files(&ctx.upload_root).len(), 2);

    let (status, _) = request(
        &ctx.app,
        "DELETE",
        "/api/tasks",
        Some(&token),
        Some(json!({"id": task["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(stored_files(&ctx.upload_root).is_empty());
}
