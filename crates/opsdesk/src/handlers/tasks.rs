//! task handlers: CRUD plus the phase/priority transition endpoints and the
//! audit trail they feed.
//!
//! the task author is never client-controlled - it is forced to the acting
//! principal on create and preserved on update. every create and phase
//! change appends one task history row.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch};
use axum::{Extension, Json, Router};
use chrono::Utc;
use sea_orm::{IntoActiveModel, Set};
use serde_json::{Value, json};
use uuid::Uuid;

use opsdesk_db::entity::{task_histories, tasks};
use opsdesk_engine::{Resource, list, pipeline};
use opsdesk_types::{Error, Principal};

use crate::AppState;
use crate::error::ApiError;
use crate::extract::read_body;
use crate::handlers::crud;
use crate::resources::Tasks;

async fn write_history(
    state: &AppState,
    task_id: i64,
    from_phase: Option<i64>,
    to_phase: i64,
    changed_by: i64,
) -> Result<(), Error> {
    let now = Utc::now();
    let row = task_histories::ActiveModel {
        name: Set(Uuid::new_v4().to_string()),
        task_id: Set(task_id),
        from_phase_id: Set(from_phase),
        to_phase_id: Set(to_phase),
        changed_by_id: Set(changed_by),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    state.db.insert(row).await?;
    Ok(())
}

/// POST / - create a task authored by the principal, with the initial
/// phase recorded in the audit trail.
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    req: Request,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (mut body, uploads) = read_body(&state, Tasks::schema(), req).await?;
    body.insert("author".to_string(), json!(principal.id));

    let task = pipeline::create::<Tasks>(&state.db, &state.store, &body, &uploads).await?;
    write_history(&state, task.id, None, task.phase_id, principal.id).await?;

    Ok((StatusCode::CREATED, Json(list::model_to_wire::<Tasks>(&task)?)))
}

/// PATCH / - update a task, preserving its original author.
pub async fn update(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<Value>, ApiError> {
    let (mut body, uploads) = read_body(&state, Tasks::schema(), req).await?;
    if let Ok(id) = pipeline::body_id(Tasks::schema(), &body)
        && let Some(existing) = state.db.find_by_id::<tasks::Entity>(id).await?
    {
        body.insert("author".to_string(), json!(existing.author_id));
    }
    let task = pipeline::update::<Tasks>(&state.db, &state.store, &body, &uploads).await?;
    Ok(Json(list::model_to_wire::<Tasks>(&task)?))
}

async fn transition(
    state: &AppState,
    principal: &Principal,
    body: &serde_json::Map<String, Value>,
    field: &str,
    parent: &str,
    label: &str,
    audited: bool,
) -> Result<Value, ApiError> {
    let value = match body.get(field) {
        Some(v) if !matches!(v, Value::Null) && !matches!(v, Value::String(s) if s.is_empty()) => v,
        _ => return Err(Error::bad_request(format!("{label} value required.")).into()),
    };
    let id = pipeline::body_id(Tasks::schema(), body)?;
    let task = state
        .db
        .find_by_id::<tasks::Entity>(id)
        .await?
        .ok_or_else(|| Error::not_found("tasks not found."))?;

    let target = pipeline::resolve_parent_ref(&state.db, parent, label, value).await?;
    let current = match field {
        "phase" => task.phase_id,
        _ => task.priority_id,
    };
    if current == target {
        return Err(Error::bad_request(format!("{label} is unchanged.")).into());
    }

    let mut model = task.clone().into_active_model();
    match field {
        "phase" => model.phase_id = Set(target),
        _ => model.priority_id = Set(target),
    }
    model.updated_at = Set(Utc::now());
    let updated = state.db.update(model).await?;

    if audited {
        write_history(state, updated.id, Some(current), target, principal.id).await?;
    }

    Ok(list::model_to_wire::<Tasks>(&updated)?)
}

/// PATCH /phase - move a task to another phase (id or name), appending an
/// audit row.
pub async fn phase(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    req: Request,
) -> Result<Json<Value>, ApiError> {
    let (body, _) = read_body(&state, Tasks::schema(), req).await?;
    let row = transition(&state, &principal, &body, "phase", "phases", "Phase", true).await?;
    Ok(Json(row))
}

/// PATCH /priority - change a task's priority (id or name). no audit row;
/// only phase transitions are audited.
pub async fn priority(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    req: Request,
) -> Result<Json<Value>, ApiError> {
    let (body, _) = read_body(&state, Tasks::schema(), req).await?;
    let row = transition(
        &state,
        &principal,
        &body,
        "priority",
        "priorities",
        "Priority",
        false,
    )
    .await?;
    Ok(Json(row))
}

/// the /api/tasks router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(crud::index::<Tasks>)
                .post(create)
                .patch(update)
                .delete(crud::remove::<Tasks>),
        )
        .route("/priority", patch(priority))
        .route("/phase", patch(phase))
        .route("/bulk", delete(crud::bulk_remove::<Tasks>))
        .route("/{id}", get(crud::show::<Tasks>))
}
