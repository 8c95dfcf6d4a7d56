//! list-parameter parsing and filter construction.
//!
//! turns the query-string contract (`page`, `limit`, `search`, `sort`,
//! `order`, one parameter per foreign-key field, entity-specific date
//! ranges) into a sea-orm [`Condition`] plus a sort application. all filter
//! fragments combine with AND; absent fragments are simply omitted.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use sea_orm::sea_query::{Expr, ExprTrait, Func, LikeExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, Order, QueryOrder, Select};

use opsdesk_types::{EndOnly, EntitySchema, Error, Result, field::is_safe_search};

use crate::{fk_column_name, snake_case};

/// validated pagination/search/sort parameters.
#[derive(Debug, Clone)]
pub struct ListParams {
    /// 1-based page number.
    pub page: u64,
    /// page size.
    pub limit: u64,
    /// raw (safe-checked) search term; empty when absent.
    pub search: String,
    /// validated sort key, wire-cased.
    pub sort: String,
    /// sort direction.
    pub order: Order,
}

/// parse and validate the common list parameters.
pub fn parse_params(schema: &EntitySchema, query: &HashMap<String, String>) -> Result<ListParams> {
    let limit = match query.get("limit").map(|s| s.trim().parse::<i64>()) {
        Some(Ok(n)) if n >= 0 => n as u64,
        _ => 10,
    };
    let page = match query.get("page").map(|s| s.trim().parse::<i64>()) {
        Some(Ok(n)) if n >= 1 => n as u64,
        _ => 1,
    };

    let search = query.get("search").cloned().unwrap_or_default();
    if !is_safe_search(&search) {
        return Err(Error::bad_request("Invalid search parameter."));
    }

    let sort = match query.get("sort") {
        Some(s) => {
            if !schema.is_sort_key(s) {
                return Err(Error::bad_request(format!("Invalid sort field: '{s}'")));
            }
            s.clone()
        }
        None => "updatedAt".to_string(),
    };

    let order = match query.get("order").map(String::as_str) {
        Some("asc") => Order::Asc,
        _ => Order::Desc,
    };

    Ok(ListParams {
        page,
        limit,
        search,
        sort,
        order,
    })
}

/// escape the LIKE metacharacters the search contract protects.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '#') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// build the combined filter condition for one list request.
pub fn build_filters<E>(
    schema: &EntitySchema,
    query: &HashMap<String, String>,
    params: &ListParams,
) -> Result<Condition>
where
    E: EntityTrait,
    E::Column: FromStr,
{
    let mut cond = Condition::all();

    // foreign-key equality filters
    for field in schema.foreign_keys() {
        let Some(raw) = query.get(field.name) else {
            continue;
        };
        if raw.is_empty() {
            if field.foreign_key.is_some_and(|fk| fk.mandatory_filter) {
                return Err(Error::bad_request(format!(
                    "Query parameter '{}' is required.",
                    field.name
                )));
            }
            continue;
        }
        let Ok(id) = raw.trim().parse::<i64>() else {
            return Err(Error::not_found(format!(
                "Data for '{}' is empty or invalid.",
                field.name
            )));
        };
        let col = column::<E>(&fk_column_name(field.name))?;
        cond = cond.add(col.eq(id));
    }

    // case-insensitive contains-OR across searchable fields
    let term = params.search.trim();
    if !term.is_empty() {
        let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
        let mut any = Condition::any();
        let mut has_searchable = false;
        for field in schema.searchable() {
            has_searchable = true;
            let col = column::<E>(&snake_case(field.name))?;
            any = any.add(
                Expr::expr(Func::lower(Expr::col(col))).like(LikeExpr::new(&pattern).escape('\\')),
            );
        }
        if has_searchable {
            cond = cond.add(any);
        }
    }

    // entity-specific date-range filter
    if let Some(window) = schema.date_window {
        cond = add_date_window::<E>(cond, &window, query)?;
    }

    Ok(cond)
}

fn column<E>(name: &str) -> Result<E::Column>
where
    E: EntityTrait,
    E::Column: FromStr,
{
    Ok(opsdesk_db::column::<E>(name)?)
}

/// apply a plain-column sort key to a select.
pub fn order_by_column<E>(select: Select<E>, key: &str, order: Order) -> Result<Select<E>>
where
    E: EntityTrait,
    E::Column: FromStr,
{
    let col = column::<E>(&snake_case(key))?;
    Ok(select.order_by(col, order))
}

// ─── Date Ranges ─────────────────────────────────────────────────────────────

/// a parsed range endpoint: either a half-open local-day interval or an
/// exact instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parsed {
    /// `[start, end)` covering one local calendar day.
    Range(DateTime<Utc>, DateTime<Utc>),
    /// an exact instant.
    Exact(DateTime<Utc>),
}

fn local_to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    match Local.from_local_datetime(&naive) {
        chrono::LocalResult::Single(t) => t.with_timezone(&Utc),
        chrono::LocalResult::Ambiguous(t, _) => t.with_timezone(&Utc),
        chrono::LocalResult::None => Utc.from_utc_datetime(&naive),
    }
}

/// parse a range endpoint: bare dates expand to a local-day interval,
/// date+time (or RFC 3339) to an exact instant.
pub fn parse_flexible(raw: &str, label: &str) -> Result<Parsed> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let next = date.checked_add_days(Days::new(1)).unwrap_or(date);
        let start = local_to_utc(date.and_hms_opt(0, 0, 0).expect("midnight"));
        let end = local_to_utc(next.and_hms_opt(0, 0, 0).expect("midnight"));
        return Ok(Parsed::Range(start, end));
    }
    for fmt in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(Parsed::Exact(local_to_utc(naive)));
        }
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Parsed::Exact(t.with_timezone(&Utc)));
    }
    Err(Error::bad_request(format!("Invalid {label} format.")))
}

fn add_date_window<E>(
    mut cond: Condition,
    window: &opsdesk_types::DateWindow,
    query: &HashMap<String, String>,
) -> Result<Condition>
where
    E: EntityTrait,
    E::Column: FromStr,
{
    let start_raw = query
        .get(window.start_param)
        .map(String::as_str)
        .filter(|s| !s.trim().is_empty());
    let end_raw = query
        .get(window.end_param)
        .map(String::as_str)
        .filter(|s| !s.trim().is_empty());

    match (start_raw, end_raw) {
        (Some(start), Some(end)) => {
            let col = column::<E>(&snake_case(window.start_column))?;
            let from = match parse_flexible(start, window.start_param)? {
                Parsed::Range(gte, _) => gte,
                Parsed::Exact(t) => t,
            };
            let (upper, inclusive) = match parse_flexible(end, window.end_param)? {
                Parsed::Range(_, lt) => (lt, false),
                Parsed::Exact(t) => (t, true),
            };
            if from > upper {
                return Err(Error::bad_request(format!(
                    "Invalid range: {} is after {}.",
                    window.start_param, window.end_param
                )));
            }
            cond = cond.add(col.gte(from));
            cond = cond.add(if inclusive {
                col.lte(upper)
            } else {
                col.lt(upper)
            });
        }
        (Some(start), None) => {
            let col = column::<E>(&snake_case(window.start_column))?;
            cond = add_single(cond, col, parse_flexible(start, window.start_param)?);
        }
        (None, Some(end)) => match window.end_only {
            EndOnly::Column(end_column) => {
                let col = column::<E>(&snake_case(end_column))?;
                cond = add_single(cond, col, parse_flexible(end, window.end_param)?);
            }
            EndOnly::ClampStart => {
                let col = column::<E>(&snake_case(window.start_column))?;
                match parse_flexible(end, window.end_param)? {
                    Parsed::Range(gte, lt) => {
                        cond = cond.add(col.gte(gte));
                        cond = cond.add(col.lt(lt));
                    }
                    Parsed::Exact(t) => cond = cond.add(col.lte(t)),
                }
            }
        },
        (None, None) => {}
    }

    Ok(cond)
}

fn add_single<C: ColumnTrait>(cond: Condition, col: C, parsed: Parsed) -> Condition {
    match parsed {
        Parsed::Range(gte, lt) => cond.add(col.gte(gte)).add(col.lt(lt)),
        Parsed::Exact(t) => cond.add(col.eq(t)),
    }
}
