//! tests for the list engine: pagination, search, sort and filters.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use sea_orm::Set;
use serde_json::json;

use common::{admin_token, request, spawn};
use opsdesk_db::entity::clients;

async fn insert_clients(ctx: &common::TestApp, count: usize) {
    for i in 0..count {
        let now = Utc::now();
        ctx.db
            .insert(clients::ActiveModel {
                name: Set(format!("Client {i:02}")),
                email: Set(Some(format!("client{i:02}@example.com"))),
                city: Set(Some(if i % 2 == 0 { "Sydney" } else { "Jakarta" }.to_string())),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            })
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn pagination_window_and_totals_hold() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;
    insert_clients(&ctx, 15).await;

    // scenario C
    let (status, body) = request(
        &ctx.app,
        "GET",
        "/api/clients?page=1&limit=10&sort=updatedAt&order=desc",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["totalData"], 15);
    assert_eq!(body["page"], 1);

    let (_, second) = request(
        &ctx.app,
        "GET",
        "/api/clients?page=2&limit=10",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(second["data"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn limit_and_page_default_on_garbage_input() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;
    insert_clients(&ctx, 12).await;

    let (status, body) = request(
        &ctx.app,
        "GET",
        "/api/clients?page=zero&limit=-4",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    assert_eq!(body["totalPages"], 2);
}

#[tokio::test]
async fn unknown_and_boolean_sort_keys_are_rejected() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    let (status, body) = request(
        &ctx.app,
        "GET",
        "/api/clients?sort=bogus",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid sort field: 'bogus'");

    // roles.status is a boolean field and may never be a sort key
    let (status, _) = request(&ctx.app, "GET", "/api/roles?sort=status", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sorting_by_name_orders_both_ways() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;
    insert_clients(&ctx, 3).await;

    let (_, asc) = request(
        &ctx.app,
        "GET",
        "/api/clients?sort=name&order=asc",
        Some(&token),
        None,
    )
    .await;
    let names: Vec<&str> = asc["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Client 00", "Client 01", "Client 02"]);

    let (_, desc) = request(
        &ctx.app,
        "GET",
        "/api/clients?sort=name&order=desc",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(
        desc["data"][0]["name"].as_str().unwrap(),
        "Client 02"
    );
}

#[tokio::test]
async fn search_matches_any_searchable_field_case_insensitively() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;
    insert_clients(&ctx, 6).await;

    let (status, body) = request(
        &ctx.app,
        "GET",
        "/api/clients?search=SYDNEY",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalData"], 3);

    // a term matching nothing yields an empty page, not an error
    let (_, body) = request(
        &ctx.app,
        "GET",
        "/api/clients?search=nowhere",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["totalData"], 0);
}

#[tokio::test]
async fn search_rejects_structural_injection_attempts() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    let (status, _) = request(
        &ctx.app,
        "GET",
        "/api/clients?search=%3Cscript%3E",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn like_metacharacters_in_search_terms_are_literal() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;
    insert_clients(&ctx, 4).await;

    // "_" must not act as a single-character wildcard
    let (status, body) = request(&ctx.app, "GET", "/api/clients?search=_", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalData"], 0);
}

#[tokio::test]
async fn foreign_key_filter_params_must_be_numeric() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    let (status, body) = request(
        &ctx.app,
        "GET",
        "/api/privileges?role=abc",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("empty or invalid"));

    // a mandatory filter key rejects an empty value outright
    let (status, body) = request(
        &ctx.app,
        "GET",
        "/api/privileges?role=",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("required"));
}

#[tokio::test]
async fn foreign_key_filters_narrow_and_include_parents() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    let (status, body) = request(
        &ctx.app,
        "GET",
        "/api/privileges?role=1&limit=100",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert!(!rows.is_empty());
    for row in rows {
        assert_eq!(row["roleId"], 1);
        // every foreign key is eagerly included in the projection
        assert!(row["role"]["name"].is_string());
        assert!(row["feature"]["name"].is_string());
    }
}

#[tokio::test]
async fn event_date_range_filters_expand_bare_dates_to_whole_days() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    // two events on different days for the admin user
    for (title, day) in [("Early", "2025-08-01"), ("Late", "2025-08-20")] {
        let (status, body) = request(
            &ctx.app,
            "POST",
            "/api/events",
            Some(&token),
            Some(json!({
                "title": title,
                "user": 1,
                "dataDate": day,
                "startTime": "12:00",
                "endTime": "13:00",
                "startDateTime": format!("{day} 12:00"),
                "endDateTime": format!("{day} 13:00"),
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
    }

    let (status, body) = request(
        &ctx.app,
        "GET",
        "/api/events?startDateTime=2025-08-01&endDateTime=2025-08-02",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["totalData"], 1);
    assert_eq!(body["data"][0]["title"], "Early");

    // inverted ranges fail fast
    let (status, body) = request(
        &ctx.app,
        "GET",
        "/api/events?startDateTime=2025-08-20&endDateTime=2025-08-01",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("is after"));

    let (status, body) = request(
        &ctx.app,
        "GET",
        "/api/events?startDateTime=whenever",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid startDateTime format.");
}
