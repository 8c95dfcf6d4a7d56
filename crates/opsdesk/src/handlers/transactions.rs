//! transaction handlers: CRUD plus the stage/client/currency transition
//! endpoints, each of which appends one audit row capturing the from/to
//! values and the acting principal.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch};
use axum::{Extension, Json, Router};
use chrono::Utc;
use sea_orm::{IntoActiveModel, Set};
use serde_json::{Value, json};
use uuid::Uuid;

use opsdesk_db::entity::{transaction_histories, transactions};
use opsdesk_engine::{Resource, list, pipeline};
use opsdesk_types::{Error, Principal};

use crate::AppState;
use crate::error::ApiError;
use crate::extract::read_body;
use crate::handlers::crud;
use crate::resources::Transactions;

/// which relation a transition addresses.
#[derive(Clone, Copy)]
enum Dimension {
    Stage,
    Client,
    Currency,
}

impl Dimension {
    fn field(self) -> &'static str {
        match self {
            Dimension::Stage => "stage",
            Dimension::Client => "client",
            Dimension::Currency => "currency",
        }
    }

    fn parent(self) -> &'static str {
        match self {
            Dimension::Stage => "stages",
            Dimension::Client => "clients",
            Dimension::Currency => "currencies",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Dimension::Stage => "Stage",
            Dimension::Client => "Client",
            Dimension::Currency => "Currency",
        }
    }
}

async fn write_history(
    state: &AppState,
    row: &transactions::Model,
    from: Option<(Dimension, i64)>,
    changed_by: i64,
) -> Result<(), Error> {
    let now = Utc::now();
    let mut entry = transaction_histories::ActiveModel {
        name: Set(Uuid::new_v4().to_string()),
        transaction_id: Set(row.id),
        to_stage_id: Set(row.stage_id),
        to_client_id: Set(row.client_id),
        to_currency_id: Set(row.currency_id),
        changed_by_id: Set(changed_by),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    match from {
        Some((Dimension::Stage, id)) => entry.from_stage_id = Set(Some(id)),
        Some((Dimension::Client, id)) => entry.from_client_id = Set(Some(id)),
        Some((Dimension::Currency, id)) => entry.from_currency_id = Set(Some(id)),
        None => {}
    }
    state.db.insert(entry).await?;
    Ok(())
}

/// POST / - create a transaction owned by the principal, recording the
/// initial stage/client/currency in the audit trail.
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    req: Request,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (mut body, uploads) = read_body(&state, Transactions::schema(), req).await?;
    body.insert("user".to_string(), json!(principal.id));

    let row = pipeline::create::<Transactions>(&state.db, &state.store, &body, &uploads).await?;
    write_history(&state, &row, None, principal.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(list::model_to_wire::<Transactions>(&row)?),
    ))
}

/// PATCH / - update a transaction, preserving its original owner.
pub async fn update(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<Value>, ApiError> {
    let (mut body, uploads) = read_body(&state, Transactions::schema(), req).await?;
    if let Ok(id) = pipeline::body_id(Transactions::schema(), &body)
        && let Some(existing) = state.db.find_by_id::<transactions::Entity>(id).await?
    {
        body.insert("user".to_string(), json!(existing.user_id));
    }
    let row = pipeline::update::<Transactions>(&state.db, &state.store, &body, &uploads).await?;
    Ok(Json(list::model_to_wire::<Transactions>(&row)?))
}

async fn transition(
    state: &AppState,
    principal: &Principal,
    body: &serde_json::Map<String, Value>,
    dimension: Dimension,
) -> Result<Value, ApiError> {
    let field = dimension.field();
    let label = dimension.label();

    let value = match body.get(field) {
        Some(v) if !matches!(v, Value::Null) && !matches!(v, Value::String(s) if s.is_empty()) => v,
        _ => return Err(Error::bad_request(format!("{label} value required.")).into()),
    };
    let id = pipeline::body_id(Transactions::schema(), body)?;
    let row = state
        .db
        .find_by_id::<transactions::Entity>(id)
        .await?
        .ok_or_else(|| Error::not_found("transactions not found."))?;

    let target = pipeline::resolve_parent_ref(&state.db, dimension.parent(), label, value).await?;
    let current = match dimension {
        Dimension::Stage => row.stage_id,
        Dimension::Client => row.client_id,
        Dimension::Currency => row.currency_id,
    };
    if current == target {
        return Err(Error::bad_request(format!("{label} is unchanged.")).into());
    }

    let mut model = row.clone().into_active_model();
    match dimension {
        Dimension::Stage => model.stage_id = Set(target),
        Dimension::Client => model.client_id = Set(target),
        Dimension::Currency => model.currency_id = Set(target),
    }
    model.updated_at = Set(Utc::now());
    let updated = state.db.update(model).await?;

    write_history(&state, &updated, Some((dimension, current)), principal.id).await?;
    Ok(list::model_to_wire::<Transactions>(&updated)?)
}

/// PATCH /stage - move a transaction along the pipeline (id or stage name).
pub async fn stage(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    req: Request,
) -> Result<Json<Value>, ApiError> {
    let (body, _) = read_body(&state, Transactions::schema(), req).await?;
    Ok(Json(
        transition(&state, &principal, &body, Dimension::Stage).await?,
    ))
}

/// PATCH /client - reassign a transaction to another client.
pub async fn client(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    req: Request,
) -> Result<Json<Value>, ApiError> {
    let (body, _) = read_body(&state, Transactions::schema(), req).await?;
    Ok(Json(
        transition(&state, &principal, &body, Dimension::Client).await?,
    ))
}

/// PATCH /currency - switch a transaction's currency.
pub async fn currency(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    req: Request,
) -> Result<Json<Value>, ApiError> {
    let (body, _) = read_body(&state, Transactions::schema(), req).await?;
    Ok(Json(
        transition(&state, &principal, &body, Dimension::Currency).await?,
    ))
}

/// the /api/transactions router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(crud::index::<Transactions>)
                .post(create)
                .patch(update)
                .delete(crud::remove::<Transactions>),
        )
        .route("/stage", patch(stage))
        .route("/client", patch(client))
        .route("/currency", patch(currency))
        .route("/bulk", delete(crud::bulk_remove::<Transactions>))
        .route("/{id}", get(crud::show::<Transactions>))
}
