//! list execution: run the structured query against the gateway, serialize
//! rows to wire JSON, attach foreign-key parents and wrap the envelope.

use std::collections::HashMap;

use sea_orm::{EntityTrait, QueryFilter};
use serde::Serialize;
use serde_json::Value;

use opsdesk_db::Db;
use opsdesk_types::{EntitySchema, Error, FieldKind, Result};

use crate::query;
use crate::{Resource, coerce, fk_wire_key};

/// the list response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ListPage {
    /// one wire-shaped row per record, parents attached.
    pub data: Vec<Value>,
    /// the page that was returned.
    pub page: u64,
    /// ceil(totalData / limit).
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
    /// count of the full filtered set, ignoring pagination.
    #[serde(rename = "totalData")]
    pub total_data: u64,
}

/// shape one serialized row for the wire: big integers become strings and
/// non-selectable fields are dropped.
pub fn shape_row(schema: &EntitySchema, mut json: Value) -> Value {
    if let Some(obj) = json.as_object_mut() {
        for field in schema.fields {
            if !field.selectable {
                obj.remove(field.name);
                continue;
            }
            if field.kind == FieldKind::BigInt
                && let Some(slot) = obj.get_mut(field.name)
                && let Some(n) = slot.as_i64()
            {
                *slot = Value::String(n.to_string());
            }
        }
    }
    json
}

/// serialize a model to its wire row.
pub fn model_to_wire<R: Resource>(model: &R::Model) -> Result<Value> {
    let json = serde_json::to_value(model).map_err(Error::internal)?;
    Ok(shape_row(R::schema(), json))
}

/// attach every foreign-key parent to the given rows, batch-loading each
/// parent entity once.
pub async fn attach_parents(db: &Db, schema: &EntitySchema, rows: &mut [Value]) -> Result<()> {
    for field in schema.foreign_keys() {
        let parent = field.foreign_key.expect("fk descriptor").parent;
        let wire_key = fk_wire_key(field.name);

        let mut ids: Vec<i64> = Vec::new();
        for row in rows.iter() {
            if let Some(id) = row.get(&wire_key).and_then(Value::as_i64)
                && !ids.contains(&id)
            {
                ids.push(id);
            }
        }

        let parents = db.load_parents(parent, &ids).await?;
        for row in rows.iter_mut() {
            let joined = row
                .get(&wire_key)
                .and_then(Value::as_i64)
                .and_then(|id| parents.get(&id).cloned())
                .unwrap_or(Value::Null);
            if let Some(obj) = row.as_object_mut() {
                obj.insert(field.name.to_string(), joined);
            }
        }
    }
    Ok(())
}

/// execute a full list request: filters, sort, pagination window, includes
/// and the `{data, page, totalPages, totalData}` envelope.
pub async fn list<R: Resource>(db: &Db, query_map: &HashMap<String, String>) -> Result<ListPage> {
    let schema = R::schema();
    let params = query::parse_params(schema, query_map)?;
    let filters = query::build_filters::<R::Entity>(schema, query_map, &params)?;

    let base = <R::Entity as EntityTrait>::find().filter(filters);
    let total = db.count(base.clone()).await?;

    let sorted = R::sort_select(base, &params.sort, params.order.clone())?;
    let skip = (params.page - 1) * params.limit;
    let rows = db.page(sorted, skip, params.limit).await?;

    let mut data = Vec::with_capacity(rows.len());
    for row in &rows {
        data.push(model_to_wire::<R>(row)?);
    }
    attach_parents(db, schema, &mut data).await?;

    Ok(ListPage {
        data,
        page: params.page,
        total_pages: if params.limit == 0 {
            0
        } else {
            total.div_ceil(params.limit)
        },
        total_data: total,
    })
}

/// fetch one record by path id with parents attached; 404 when absent.
pub async fn get_one<R: Resource>(db: &Db, raw_id: &str) -> Result<Value> {
    let id = coerce::parse_safe_int_str(raw_id)
        .ok_or_else(|| Error::bad_request("Invalid module ID."))?;
    let model = db
        .find_by_id::<R::Entity>(id)
        .await?
        .ok_or_else(|| Error::not_found("Not Found"))?;

    let mut rows = vec![model_to_wire::<R>(&model)?];
    attach_parents(db, R::schema(), &mut rows).await?;
    Ok(rows.pop().expect("single row"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shape_row_stringifies_big_integers() {
        let schema = &opsdesk_types::schema::transactions::SCHEMA;
        let shaped = shape_row(schema, json!({"id": 1, "amount": 9007199254740993i64}));
        assert_eq!(shaped["amount"], json!("9007199254740993"));
        assert_eq!(shaped["id"], json!(1));
    }

    #[test]
    fn shape_row_drops_non_selectable_fields() {
        let schema = &opsdesk_types::schema::users::SCHEMA;
        let shaped = shape_row(schema, json!({"id": 1, "password": "$argon2id$..."}));
        assert!(shaped.get("password").is_none());
    }
}
