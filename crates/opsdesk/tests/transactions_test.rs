//! tests for the billing flows: transaction creation, precision-safe
//! amounts, stage/client/currency transitions and their audit trail.

mod common;

use axum::http::StatusCode;
use sea_orm::{ColumnTrait, Condition};
use serde_json::{Value, json};

use common::{admin_token, request, spawn};
use opsdesk_db::entity::transaction_histories;

async fn create_client(ctx: &common::TestApp, token: &str, name: &str) -> i64 {
    let (status, body) = request(
        &ctx.app,
        "POST",
        "/api/clients",
        Some(token),
        Some(json!({"name": name})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

async fn create_transaction(ctx: &common::TestApp, token: &str, client: i64) -> Value {
    let (status, body) = request(
        &ctx.app,
        "POST",
        "/api/transactions",
        Some(token),
        Some(json!({
            "name": "Therapy package",
            "client": client,
            "stage": 1,
            "currency": 1,
            "amount": "9007199254740993",
            "transactionDate": "2025-08-01 10:00",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

async fn history_rows(
    ctx: &common::TestApp,
    transaction_id: i64,
) -> Vec<transaction_histories::Model> {
    ctx.db
        .find_all::<transaction_histories::Entity>(
            Condition::all().add(transaction_histories::Column::TransactionId.eq(transaction_id)),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn create_serializes_amounts_as_strings_and_audits_the_initial_state() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;
    let client = create_client(&ctx, &token, "Precision Clinic").await;

    let row = create_transaction(&ctx, &token, client).await;
    // beyond-f64 amounts survive as strings on the wire
    assert_eq!(row["amount"], json!("9007199254740993"));
    assert_eq!(row["userId"], 1);

    let history = history_rows(&ctx, row["id"].as_i64().unwrap()).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].from_stage_id, None);
    assert_eq!(history[0].to_stage_id, 1);
    assert_eq!(history[0].to_client_id, client);
    assert_eq!(history[0].to_currency_id, 1);
}

#[tokio::test]
async fn amounts_out_of_digit_bounds_are_rejected() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;
    let client = create_client(&ctx, &token, "Budget Clinic").await;

    // 19 digits exceeds the declared 18-digit bound
    let (status, body) = request(
        &ctx.app,
        "POST",
        "/api/transactions",
        Some(&token),
        Some(json!({
            "name": "Too large",
            "client": client,
            "stage": 1,
            "currency": 1,
            "amount": "1000000000000000000",
            "transactionDate": "2025-08-01 10:00",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("amount"));
}

#[tokio::test]
async fn stage_transition_by_name_writes_one_audit_row() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;
    let client = create_client(&ctx, &token, "Movable Clinic").await;
    let row = create_transaction(&ctx, &token, client).await;
    let id = row["id"].as_i64().unwrap();

    let (status, body) = request(
        &ctx.app,
        "PATCH",
        "/api/transactions/stage",
        Some(&token),
        Some(json!({"id": id, "stage": "billed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["stageId"], 5);

    let (status, body) = request(
        &ctx.app,
        "PATCH",
        "/api/transactions/stage",
        Some(&token),
        Some(json!({"id": id, "stage": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Stage is unchanged.");

    let history = history_rows(&ctx, id).await;
    assert_eq!(history.len(), 2);
    let transition = history.iter().find(|h| h.from_stage_id.is_some()).unwrap();
    assert_eq!(transition.from_stage_id, Some(1));
    assert_eq!(transition.to_stage_id, 5);
}

#[tokio::test]
async fn client_and_currency_transitions_audit_their_dimension() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;
    let original = create_client(&ctx, &token, "Original Clinic").await;
    let replacement = create_client(&ctx, &token, "Replacement Clinic").await;
    let row = create_transaction(&ctx, &token, original).await;
    let id = row["id"].as_i64().unwrap();

    let (status, body) = request(
        &ctx.app,
        "PATCH",
        "/api/transactions/client",
        Some(&token),
        Some(json!({"id": id, "client": replacement})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["clientId"], json!(replacement));

    let (status, body) = request(
        &ctx.app,
        "PATCH",
        "/api/transactions/currency",
        Some(&token),
        Some(json!({"id": id, "currency": "EUR"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let history = history_rows(&ctx, id).await;
    assert_eq!(history.len(), 3);
    assert!(history.iter().any(|h| h.from_client_id == Some(original)));
    assert!(history.iter().any(|h| h.from_currency_id == Some(1)));
}

#[tokio::test]
async fn joined_sorting_by_client_name_works() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;
    let zebra = create_client(&ctx, &token, "Zebra Clinic").await;
    let alpha = create_client(&ctx, &token, "Alpha Clinic").await;
    create_transaction(&ctx, &token, zebra).await;
    create_transaction(&ctx, &token, alpha).await;

    let (status, body) = request(
        &ctx.app,
        "GET",
        "/api/transactions?sort=client.name&order=asc",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["client"]["name"], "Alpha Clinic");
    assert_eq!(rows[1]["client"]["name"], "Zebra Clinic");
}

#[tokio::test]
async fn dashboard_counts_tasks_per_phase() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    for name in ["One", "Two"] {
        let (status, _) = request(
            &ctx.app,
            "POST",
            "/api/tasks",
            Some(&token),
            Some(json!({"name": name, "priority": 1, "phase": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = request(&ctx.app, "GET", "/api/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["phases"]["to_do"], 2);
    assert_eq!(body["phases"]["closed"], 0);
}
