//! event handlers: generic CRUD with day-overlap enrichment on getOne.
//!
//! an event's `overlapCount`/`overlapOrder` describe how many events share
//! wall-clock time with it on the same day for the same user, and where it
//! sits among them - the calendar UI uses this to split columns.

use axum::extract::{Path, State};
use axum::routing::{delete, get};
use axum::{Json, Router};
use sea_orm::{ColumnTrait, Condition};
use serde_json::{Value, json};

use opsdesk_db::entity::events;
use opsdesk_engine::{Resource, coerce, list};
use opsdesk_types::Error;

use crate::AppState;
use crate::error::ApiError;
use crate::handlers::crud;
use crate::resources::Events;

fn start_hour(clock: &str) -> i64 {
    clock
        .split(':')
        .next()
        .and_then(|h| h.parse::<i64>().ok())
        .unwrap_or(0)
}

/// count overlapping siblings and the target's position among them.
fn overlap_of(target: &events::Model, siblings: &[events::Model]) -> (i64, i64) {
    let start = start_hour(&target.start_time);
    let end = start_hour(&target.end_time);
    let mut count = 1;
    let mut order = 1;
    for other in siblings {
        if other.id == target.id {
            continue;
        }
        let other_start = start_hour(&other.start_time);
        let other_end = start_hour(&other.end_time);
        let overlaps = !(end <= other_start || start >= other_end);
        if overlaps {
            count += 1;
            if other.id < target.id {
                order += 1;
            }
        }
    }
    (order, count)
}

/// GET /{id} - one event with its parents and overlap metadata.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = coerce::parse_safe_int_str(&id)
        .ok_or_else(|| Error::bad_request("Invalid module ID."))?;
    let event = state
        .db
        .find_by_id::<events::Entity>(id)
        .await?
        .ok_or_else(|| Error::not_found("Not Found"))?;

    let siblings = state
        .db
        .find_all::<events::Entity>(
            Condition::all()
                .add(events::Column::UserId.eq(event.user_id))
                .add(events::Column::DataDate.eq(event.data_date)),
        )
        .await?;
    let (order, count) = overlap_of(&event, &siblings);

    let mut rows = vec![list::model_to_wire::<Events>(&event)?];
    list::attach_parents(&state.db, Events::schema(), &mut rows).await?;
    let mut row = rows.pop().expect("single row");
    row["overlapOrder"] = json!(order);
    row["overlapCount"] = json!(count);
    Ok(Json(row))
}

/// the /api/events router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(crud::index::<Events>)
                .post(crud::create::<Events>)
                .patch(crud::update::<Events>)
                .delete(crud::remove::<Events>),
        )
        .route("/bulk", delete(crud::bulk_remove::<Events>))
        .route("/{id}", get(show))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event(id: i64, start: &str, end: &str) -> events::Model {
        events::Model {
            id,
            title: format!("event {id}"),
            user_id: 1,
            data_date: Utc::now(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            start_date_time: None,
            end_date_time: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn disjoint_events_do_not_overlap() {
        let a = event(1, "09:00", "10:00");
        let b = event(2, "10:00", "11:00");
        let all = vec![a.clone(), b.clone()];
        assert_eq!(overlap_of(&a, &all), (1, 1));
        assert_eq!(overlap_of(&b, &all), (1, 1));
    }

    #[test]
    fn overlapping_events_count_and_order_each_other() {
        let a = event(1, "09:00", "11:00");
        let b = event(2, "10:00", "12:00");
        let c = event(3, "10:00", "11:00");
        let all = vec![a.clone(), b.clone(), c.clone()];
        assert_eq!(overlap_of(&a, &all), (1, 3));
        assert_eq!(overlap_of(&b, &all), (2, 3));
        assert_eq!(overlap_of(&c, &all), (3, 3));
    }
}
