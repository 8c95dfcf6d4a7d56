//! tests for the generic create/update/delete pipeline over the http surface.

mod common;

use axum::http::StatusCode;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter};
use serde_json::json;

use common::{admin_token, request, spawn};
use opsdesk_db::entity::{clients, roles};

#[tokio::test]
async fn create_with_valid_fields_returns_201_and_an_id() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    // scenario A
    let (status, body) = request(
        &ctx.app,
        "POST",
        "/api/clients",
        Some(&token),
        Some(json!({"name": "Acme Health", "email": "billing@acme.example", "city": "Sydney"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["name"], "Acme Health");
}

#[tokio::test]
async fn create_missing_a_required_field_names_it_and_persists_nothing() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    // scenario B: clients require a name
    let (status, body) = request(
        &ctx.app,
        "POST",
        "/api/clients",
        Some(&token),
        Some(json!({"email": "noname@acme.example"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("name"));

    let count = ctx
        .db
        .count(
            clients::Entity::find().filter(
                Condition::all().add(clients::Column::Email.eq("noname@acme.example")),
            ),
        )
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn missing_required_fields_are_aggregated_into_one_message() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    let (status, body) = request(&ctx.app, "POST", "/api/roles", Some(&token), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("name"));
    assert!(message.contains("description"));
}

#[tokio::test]
async fn duplicate_unique_values_conflict() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    // USD is seeded
    let (status, body) = request(
        &ctx.app,
        "POST",
        "/api/currencies",
        Some(&token),
        Some(json!({"name": "USD", "symbol": "$"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn update_excludes_the_row_itself_from_the_uniqueness_check() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    let (_, created) = request(
        &ctx.app,
        "POST",
        "/api/currencies",
        Some(&token),
        Some(json!({"name": "CHF", "symbol": "Fr"})),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    // same name, same row: allowed
    let (status, body) = request(
        &ctx.app,
        "PATCH",
        "/api/currencies",
        Some(&token),
        Some(json!({"id": id, "name": "CHF", "symbol": "CHF"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["symbol"], "CHF");

    // colliding with another row: conflict
    let (status, _) = request(
        &ctx.app,
        "PATCH",
        "/api/currencies",
        Some(&token),
        Some(json!({"id": id, "name": "USD", "symbol": "$"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn update_requires_a_safe_integer_id() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    let (status, body) = request(
        &ctx.app,
        "PATCH",
        "/api/currencies",
        Some(&token),
        Some(json!({"id": "abc", "name": "XYZ", "symbol": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid currencies ID.");
}

#[tokio::test]
async fn foreign_keys_must_reference_existing_parents() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    let (status, body) = request(
        &ctx.app,
        "POST",
        "/api/privileges",
        Some(&token),
        Some(json!({"role": 999, "feature": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Parent data not found"));
}

#[tokio::test]
async fn guarded_entities_keep_their_last_row() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    // delete the two roles without users until one remains
    for name in ["Operator", "Admin"] {
        let role = ctx
            .db
            .find_first::<roles::Entity>(Condition::all().add(roles::Column::Name.eq(name)))
            .await
            .unwrap()
            .unwrap();
        let (status, body) = request(
            &ctx.app,
            "DELETE",
            "/api/roles",
            Some(&token),
            Some(json!({"id": role.id})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    // scenario F: the final row is protected
    let survivor = ctx
        .db
        .find_first::<roles::Entity>(Condition::all())
        .await
        .unwrap()
        .unwrap();
    let (status, body) = request(
        &ctx.app,
        "DELETE",
        "/api/roles",
        Some(&token),
        Some(json!({"id": survivor.id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("at least have 1 data"));

    let remaining = ctx.db.count(roles::Entity::find()).await.unwrap();
    assert_eq!(remaining, 1);
}

#[tokio::test]
async fn bulk_delete_rejects_non_numeric_ids_by_name() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    let (status, body) = request(
        &ctx.app,
        "DELETE",
        "/api/clients/bulk",
        Some(&token),
        Some(json!({"ids": "1, two, 3, x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("two"));
    assert!(message.contains("x"));
}

#[tokio::test]
async fn bulk_delete_removes_every_matched_row() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    let mut ids = Vec::new();
    for name in ["Bulk A", "Bulk B", "Bulk C"] {
        let (_, body) = request(
            &ctx.app,
            "POST",
            "/api/clients",
            Some(&token),
            Some(json!({"name": name})),
        )
        .await;
        ids.push(body["id"].as_i64().unwrap());
    }

    let list = ids
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",");
    let (status, body) = request(
        &ctx.app,
        "DELETE",
        "/api/clients/bulk",
        Some(&token),
        Some(json!({"ids": list})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, listing) = request(&ctx.app, "GET", "/api/clients?search=Bulk", Some(&token), None).await;
    assert_eq!(listing["totalData"], 0);
}

#[tokio::test]
async fn bulk_delete_of_privileges_stays_inside_one_role() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    // pick one privilege row from two different roles
    let rows = ctx
        .db
        .find_all::<opsdesk_db::entity::privileges::Entity>(Condition::all())
        .await
        .unwrap();
    let first = rows.first().unwrap();
    let other = rows
        .iter()
        .find(|p| p.role_id != first.role_id)
        .expect("seeded privileges span roles");

    let (status, body) = request(
        &ctx.app,
        "DELETE",
        "/api/privileges/bulk",
        Some(&token),
        Some(json!({"ids": format!("{},{}", first.id, other.id)})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("single role"));
}

#[tokio::test]
async fn feature_toggles_flip_exactly_one_flag() {
    let ctx = spawn().await;
    let token = admin_token(&ctx.app).await;

    let feature = ctx
        .db
        .find_first::<opsdesk_db::entity::features::Entity>(
            Condition::all().add(opsdesk_db::entity::features::Column::Name.eq("tasks")),
        )
        .await
        .unwrap()
        .unwrap();

    let (status, body) = request(
        &ctx.app,
        "PATCH",
        "/api/features/featureDelete",
        Some(&token),
        Some(json!({"id": feature.id, "featureDelete": "false"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["featureDelete"], false);
    assert_eq!(body["featureRead"], true);

    let (status, body) = request(
        &ctx.app,
        "PATCH",
        "/api/features/featureDelete",
        Some(&token),
        Some(json!({"id": feature.id, "featureDelete": "maybe"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Invalid feature value."));
}
