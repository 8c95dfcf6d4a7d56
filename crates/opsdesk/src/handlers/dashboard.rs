//! dashboard handler: the task-board overview counts.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::{Map, Value, json};

use opsdesk_db::entity::{phases, tasks};

use crate::AppState;
use crate::error::ApiError;

/// GET / - total task count plus tasks-per-phase, keyed by phase name.
pub async fn overview(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let total = state.db.count(tasks::Entity::find()).await?;

    let all_phases = state
        .db
        .find_all::<phases::Entity>(sea_orm::Condition::all())
        .await?;

    let mut per_phase = Map::new();
    for phase in all_phases {
        let count = state
            .db
            .count(tasks::Entity::find().filter(tasks::Column::PhaseId.eq(phase.id)))
            .await?;
        per_phase.insert(phase.name, json!(count));
    }

    Ok(Json(json!({
        "total": total,
        "phases": per_phase,
    })))
}

/// the /api/dashboard router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(overview))
}
