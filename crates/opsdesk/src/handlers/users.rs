//! user handlers: admin-scoped CRUD.
//!
//! non-administrative callers only ever see themselves - list and getOne
//! collapse to the caller's own row regardless of the requested id.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde_json::Value;

use opsdesk_engine::list;

use crate::AppState;
use crate::error::ApiError;
use crate::handlers::crud;
use crate::middleware::{authenticate, is_admin};
use crate::resources::Users;

/// GET / - the full list for admins, the caller's own row otherwise.
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    if is_admin(&state, &headers).await? {
        let page = list::list::<Users>(&state.db, &query).await?;
        Ok(Json(serde_json::to_value(page).map_err(
            opsdesk_types::Error::internal,
        )?))
    } else {
        let (user, _, _) = authenticate(&state, &headers).await?;
        Ok(Json(list::get_one::<Users>(&state.db, &user.id.to_string()).await?))
    }
}

/// GET /{id} - admins fetch anyone; everyone else gets themselves.
pub async fn show(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = if is_admin(&state, &headers).await? {
        id
    } else {
        let (user, _, _) = authenticate(&state, &headers).await?;
        user.id.to_string()
    };
    Ok(Json(list::get_one::<Users>(&state.db, &id).await?))
}

/// the /api/users router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(index)
                .post(crud::create::<Users>)
                .patch(crud::update::<Users>)
                .delete(crud::remove::<Users>),
        )
        .route("/bulk", delete(crud::bulk_remove::<Users>))
        .route("/{id}", get(show))
}
