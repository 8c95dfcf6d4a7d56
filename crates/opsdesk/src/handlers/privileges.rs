//! privilege handlers: CRUD plus the four per-bit toggles.
//!
//! privilege rows are named with a generated uuid on create so the unique
//! name constraint holds without the caller inventing one.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch};
use axum::{Json, Router};
use serde_json::{Value, json};
use uuid::Uuid;

use opsdesk_engine::{Resource, list, pipeline};

use crate::AppState;
use crate::error::ApiError;
use crate::extract::read_body;
use crate::handlers::crud::{self, toggle_flag};
use crate::resources::Privileges;

/// POST / - create a privilege row with a generated name.
pub async fn create(
    State(state): State<AppState>,
    req: Request,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (mut body, uploads) = read_body(&state, Privileges::schema(), req).await?;
    body.insert("name".to_string(), json!(Uuid::new_v4().to_string()));
    let model = pipeline::create::<Privileges>(&state.db, &state.store, &body, &uploads).await?;
    Ok((
        StatusCode::CREATED,
        Json(list::model_to_wire::<Privileges>(&model)?),
    ))
}

/// PATCH / - update a privilege row, keeping its generated name.
pub async fn update(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<Value>, ApiError> {
    let (mut body, uploads) = read_body(&state, Privileges::schema(), req).await?;
    if let Ok(id) = pipeline::body_id(Privileges::schema(), &body)
        && let Some(existing) = state
            .db
            .find_by_id::<opsdesk_db::entity::privileges::Entity>(id)
            .await?
    {
        body.insert("name".to_string(), json!(existing.name));
    }
    let model = pipeline::update::<Privileges>(&state.db, &state.store, &body, &uploads).await?;
    Ok(Json(list::model_to_wire::<Privileges>(&model)?))
}

macro_rules! toggle {
    ($fn_name:ident, $field:literal) => {
        /// PATCH one privilege bit.
        pub async fn $fn_name(
            State(state): State<AppState>,
            req: Request,
        ) -> Result<Json<Value>, ApiError> {
            let (body, _) = read_body(&state, Privileges::schema(), req).await?;
            Ok(Json(
                toggle_flag::<Privileges>(&state, &body, $field, "privilege").await?,
            ))
        }
    };
}

toggle!(privilege_create, "privilegeCreate");
toggle!(privilege_read, "privilegeRead");
toggle!(privilege_update, "privilegeUpdate");
toggle!(privilege_delete, "privilegeDelete");

/// the /api/privileges router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(crud::index::<Privileges>)
                .post(create)
                .patch(update)
                .delete(crud::remove::<Privileges>),
        )
        .route("/privilegeCreate", patch(privilege_create))
        .route("/privilegeRead", patch(privilege_read))
        .route("/privilegeUpdate", patch(privilege_update))
        .route("/privilegeDelete", patch(privilege_delete))
        .route("/bulk", delete(crud::bulk_remove::<Privileges>))
        .route("/{id}", get(crud::show::<Privileges>))
}
