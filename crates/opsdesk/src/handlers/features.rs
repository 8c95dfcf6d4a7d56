//! feature handlers: CRUD plus the four default-permission toggles.

use axum::extract::{Request, State};
use axum::routing::{delete, get, patch};
use axum::{Json, Router};
use serde_json::Value;

use crate::AppState;
use crate::error::ApiError;
use crate::extract::read_body;
use crate::handlers::crud::{self, toggle_flag};
use crate::resources::Features;

use opsdesk_engine::Resource;

macro_rules! toggle {
    ($fn_name:ident, $field:literal) => {
        /// PATCH one default-permission flag.
        pub async fn $fn_name(
            State(state): State<AppState>,
            req: Request,
        ) -> Result<Json<Value>, ApiError> {
            let (body, _) = read_body(&state, Features::schema(), req).await?;
            Ok(Json(
                toggle_flag::<Features>(&state, &body, $field, "feature").await?,
            ))
        }
    };
}

toggle!(feature_create, "featureCreate");
toggle!(feature_read, "featureRead");
toggle!(feature_update, "featureUpdate");
toggle!(feature_delete, "featureDelete");

/// the /api/features router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(crud::index::<Features>)
                .post(crud::create::<Features>)
                .patch(crud::update::<Features>)
                .delete(crud::remove::<Features>),
        )
        .route("/featureCreate", patch(feature_create))
        .route("/featureRead", patch(feature_read))
        .route("/featureUpdate", patch(feature_update))
        .route("/featureDelete", patch(feature_delete))
        .route("/bulk", delete(crud::bulk_remove::<Features>))
        .route("/{id}", get(crud::show::<Features>))
}
