//! generic CRUD handlers - one set of functions serving every entity
//! through its [`HttpResource`] implementation.

use std::collections::HashMap;

use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde_json::Value;

use opsdesk_engine::{ListPage, Resource, list, pipeline};
use opsdesk_types::Error;

use crate::AppState;
use crate::error::ApiError;
use crate::extract::read_body;
use crate::middleware::is_admin;
use crate::resources::HttpResource;

/// GET `/` - the list engine.
pub async fn index<R: HttpResource>(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<ListPage>, ApiError> {
    Ok(Json(list::list::<R>(&state.db, &query).await?))
}

/// GET `/{id}` - one record with parents attached.
pub async fn show<R: HttpResource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(list::get_one::<R>(&state.db, &id).await?))
}

/// POST `/` - validated create.
pub async fn create<R: HttpResource>(
    State(state): State<AppState>,
    req: Request,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (body, uploads) = read_body(&state, R::schema(), req).await?;
    let model = pipeline::create::<R>(&state.db, &state.store, &body, &uploads).await?;
    Ok((StatusCode::CREATED, Json(list::model_to_wire::<R>(&model)?)))
}

/// PATCH `/` - validated update with file diffing.
pub async fn update<R: HttpResource>(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<Value>, ApiError> {
    let (body, uploads) = read_body(&state, R::schema(), req).await?;
    let model = pipeline::update::<R>(&state.db, &state.store, &body, &uploads).await?;
    Ok(Json(list::model_to_wire::<R>(&model)?))
}

/// DELETE `/` - gated single delete by body id.
pub async fn remove<R: HttpResource>(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<Value>, ApiError> {
    if R::ADMIN_DELETE {
        let headers = req.headers().clone();
        if !is_admin(&state, &headers).await? {
            return Err(Error::unauthorized(format!(
                "You dont have rights to remove this {}",
                R::schema().entity
            ))
            .into());
        }
    }
    let (body, _) = read_body(&state, R::schema(), req).await?;
    let model =
        pipeline::delete_one::<R>(&state.db, &state.store, &body, R::GUARD_LAST_ROW).await?;
    Ok(Json(list::model_to_wire::<R>(&model)?))
}

/// DELETE `/bulk` - gated bulk delete by id list.
pub async fn bulk_remove<R: HttpResource>(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<Vec<Value>>, ApiError> {
    if R::ADMIN_DELETE {
        let headers = req.headers().clone();
        if !is_admin(&state, &headers).await? {
            return Err(Error::unauthorized(format!(
                "You dont have rights to remove this {}",
                R::schema().entity
            ))
            .into());
        }
    }
    let (body, _) = read_body(&state, R::schema(), req).await?;
    let rows = pipeline::bulk_delete::<R>(&state.db, &state.store, &body).await?;
    let mut out = Vec::with_capacity(rows.len());
    for row in &rows {
        out.push(list::model_to_wire::<R>(row)?);
    }
    Ok(Json(out))
}

/// flip one boolean column of a row, shared by the feature and privilege
/// toggle endpoints. accepts real booleans and the "true"/"false" literals.
pub(crate) async fn toggle_flag<R: HttpResource>(
    state: &AppState,
    body: &serde_json::Map<String, Value>,
    field: &'static str,
    label: &str,
) -> Result<Value, ApiError> {
    let status = match body.get(field) {
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::String(s)) if s == "true" => Some(true),
        Some(Value::String(s)) if s == "false" => Some(false),
        _ => None,
    }
    .ok_or_else(|| Error::bad_request(format!("Invalid {label} value.")))?;

    let id = pipeline::body_id(R::schema(), body)?;
    let existing = state
        .db
        .find_by_id::<R::Entity>(id)
        .await?
        .ok_or_else(|| Error::not_found(format!("{} not found.", R::schema().entity)))?;

    let mut input = opsdesk_types::RecordInput::new();
    input.insert(field.to_string(), opsdesk_types::FieldValue::Flag(status));
    let updated = state.db.update(R::update_model(existing, &input)).await?;
    Ok(list::model_to_wire::<R>(&updated)?)
}

/// the standard router for a fully CRUD-managed entity.
pub fn routes<R: HttpResource>() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(index::<R>)
                .post(create::<R>)
                .patch(update::<R>)
                .delete(remove::<R>),
        )
        .route("/bulk", delete(bulk_remove::<R>))
        .route("/{id}", get(show::<R>))
}

/// list + getOne only (audit trails).
pub fn read_only_routes<R: HttpResource>() -> Router<AppState> {
    Router::new()
        .route("/", get(index::<R>))
        .route("/{id}", get(show::<R>))
}
