//! the validated create/update/delete pipeline.
//!
//! orchestrates the coercion unit, uniqueness and foreign-key checks, file
//! diffing and the final gateway write. every failure path that can follow
//! an upload discards this request's stored files before the error
//! propagates, so rejected operations leave no orphans behind.

use std::collections::HashSet;

use sea_orm::{ColumnTrait, Condition, EntityTrait};
use serde::Serialize;
use serde_json::{Map, Value};

use tracing::debug;

use opsdesk_db::Db;
use opsdesk_types::{EntitySchema, Error, FieldDescriptor, FieldValue, RecordInput, Result};

use crate::files::{FileStore, UploadedFiles, discard_uploads};
use crate::{Resource, coerce, fk_wire_key, snake_case};

/// parse the body `id` as a safe integer, with the entity-labelled error.
pub fn body_id(schema: &EntitySchema, body: &Map<String, Value>) -> Result<i64> {
    body.get("id")
        .and_then(coerce::parse_safe_int)
        .ok_or_else(|| Error::bad_request(format!("Invalid {} ID.", schema.entity)))
}

async fn unique_collision<R: Resource>(
    db: &Db,
    field: &FieldDescriptor,
    value: &FieldValue,
    exclude_id: Option<i64>,
) -> Result<bool> {
    let col = opsdesk_db::column::<R::Entity>(&snake_case(field.name))?;
    let expr = match value {
        FieldValue::Text(s) => col.eq(s.as_str()),
        FieldValue::Int(n) | FieldValue::Big(n) => col.eq(*n),
        FieldValue::Flag(b) => col.eq(*b),
        FieldValue::Stamp(t) => col.eq(*t),
        FieldValue::Null => return Ok(false),
    };
    let mut cond = Condition::all().add(expr);
    if let Some(id) = exclude_id {
        let id_col = opsdesk_db::column::<R::Entity>("id")?;
        cond = cond.add(id_col.ne(id));
    }
    Ok(db.find_first::<R::Entity>(cond).await?.is_some())
}

/// coerce, validate and (for hashed fields) hash the request body.
///
/// all field checks complete before any error is raised; the aggregated
/// message carries the first problem's status, which field ordering in the
/// schema makes deterministic.
async fn validated_input<R: Resource>(
    db: &Db,
    body: &Map<String, Value>,
    uploads: &UploadedFiles,
    exclude_id: Option<i64>,
) -> Result<RecordInput> {
    let schema = R::schema();
    let mut input = RecordInput::new();

    for field in schema.fields {
        if field.is_file() {
            // file fields take the stored upload path; the body is ignored
            if let Some(path) = uploads.get(field.name) {
                input.insert(field.name.to_string(), FieldValue::Text(path.to_string()));
            }
            continue;
        }
        let Some(raw) = body.get(field.name) else {
            continue;
        };
        if matches!(raw, Value::String(s) if s.is_empty()) {
            continue;
        }
        if let Some(value) = coerce::coerce_value(field, raw) {
            input.insert(field.name.to_string(), value);
        }
    }

    let mut issues: Vec<(u16, String)> = Vec::new();
    for field in schema.fields {
        let value = input.get(field.name);
        issues.extend(coerce::check_field(field, value));
        if field.unique
            && let Some(value) = value
            && unique_collision::<R>(db, field, value, exclude_id).await?
        {
            issues.push((409, format!("Field {} already exists", field.name)));
        }
    }
    if !issues.is_empty() {
        let status = issues[0].0;
        let joined = issues
            .iter()
            .map(|(_, m)| m.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(Error::from_status(status, format!("Validation failed: {joined}")));
    }

    // hash after validation so the length check saw the raw secret
    for field in schema.fields.iter().filter(|f| f.hashed) {
        let raw = input
            .get(field.name)
            .and_then(|v| v.as_text().map(str::to_string));
        if let Some(raw) = raw {
            let hashed = opsdesk_auth::hash_password(&raw).map_err(opsdesk_types::Error::from)?;
            input.insert(field.name.to_string(), FieldValue::Text(hashed));
        }
    }

    Ok(input)
}

/// verify every present foreign-key value references an existing parent row.
async fn check_parents(db: &Db, schema: &EntitySchema, input: &RecordInput) -> Result<()> {
    for field in schema.foreign_keys() {
        let Some(id) = input.get(field.name).and_then(FieldValue::as_int) else {
            continue;
        };
        let parent = field.foreign_key.expect("fk descriptor").parent;
        if !db.parent_exists(parent, id).await? {
            return Err(Error::bad_request(format!("Parent data not found: {parent}")));
        }
    }
    Ok(())
}

fn missing_required_error(
    schema: &EntitySchema,
    body: &Map<String, Value>,
    uploads: &UploadedFiles,
) -> Result<()> {
    let missing = coerce::missing_required(schema, body, uploads);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::bad_request(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// validated create. on any failure the request's uploads are discarded.
pub async fn create<R: Resource>(
    db: &Db,
    store: &impl FileStore,
    body: &Map<String, Value>,
    uploads: &UploadedFiles,
) -> Result<R::Model> {
    let result = create_inner::<R>(db, body, uploads).await;
    if result.is_err() {
        discard_uploads(store, uploads).await;
    }
    result
}

async fn create_inner<R: Resource>(
    db: &Db,
    body: &Map<String, Value>,
    uploads: &UploadedFiles,
) -> Result<R::Model> {
    let schema = R::schema();
    missing_required_error(schema, body, uploads)?;
    let input = validated_input::<R>(db, body, uploads, None).await?;
    check_parents(db, schema, &input).await?;
    debug!(entity = schema.entity, fields = input.len(), "validated create");
    Ok(db.insert(R::insert_model(&input)).await?)
}

/// validated update with file diffing. stale files are removed only after
/// the new record state has been persisted; on failure the fresh uploads are
/// discarded instead.
pub async fn update<R: Resource>(
    db: &Db,
    store: &impl FileStore,
    body: &Map<String, Value>,
    uploads: &UploadedFiles,
) -> Result<R::Model> {
    match update_inner::<R>(db, store, body, uploads).await {
        Ok(model) => Ok(model),
        Err(err) => {
            discard_uploads(store, uploads).await;
            Err(err)
        }
    }
}

async fn update_inner<R: Resource>(
    db: &Db,
    store: &impl FileStore,
    body: &Map<String, Value>,
    uploads: &UploadedFiles,
) -> Result<R::Model> {
    let schema = R::schema();
    let id = body_id(schema, body)?;
    let existing = db
        .find_by_id::<R::Entity>(id)
        .await?
        .ok_or_else(|| Error::bad_request(format!("{} Not Found.", schema.entity)))?;

    // file diff: a replaced file marks the old one stale; an explicit empty
    // body value with no upload clears the field and marks the old one stale
    let stored = serde_json::to_value(&existing).map_err(Error::internal)?;
    let mut stale: Vec<String> = Vec::new();
    let mut cleared: Vec<&str> = Vec::new();
    for field in schema.file_fields() {
        let current = stored.get(field.name).and_then(Value::as_str);
        match uploads.get(field.name) {
            Some(fresh) => {
                if let Some(old) = current
                    && old != fresh
                {
                    stale.push(old.to_string());
                }
            }
            None => {
                if matches!(body.get(field.name), Some(Value::String(s)) if s.is_empty()) {
                    if let Some(old) = current {
                        stale.push(old.to_string());
                    }
                    cleared.push(field.name);
                }
            }
        }
    }

    missing_required_error(schema, body, uploads)?;
    let mut input = validated_input::<R>(db, body, uploads, Some(id)).await?;
    for name in cleared {
        input.insert(name.to_string(), FieldValue::Null);
    }
    check_parents(db, schema, &input).await?;

    let updated = db.update(R::update_model(existing, &input)).await?;
    if !stale.is_empty() {
        debug!(entity = schema.entity, stale = stale.len(), "removing replaced files");
    }
    for path in stale {
        store.remove(&path).await;
    }
    Ok(updated)
}

async fn remove_row_files<M: Serialize>(
    store: &impl FileStore,
    schema: &EntitySchema,
    row: &M,
) -> Result<()> {
    let json = serde_json::to_value(row).map_err(Error::internal)?;
    for field in schema.file_fields() {
        if let Some(path) = json.get(field.name).and_then(Value::as_str) {
            store.remove(path).await;
        }
    }
    Ok(())
}

/// delete one row by body id, removing its stored files first.
///
/// `keep_last` guards configuration-like entities: the delete is refused
/// when it would remove the final remaining row.
pub async fn delete_one<R: Resource>(
    db: &Db,
    store: &impl FileStore,
    body: &Map<String, Value>,
    keep_last: bool,
) -> Result<R::Model> {
    let schema = R::schema();
    let id = body
        .get("id")
        .and_then(coerce::parse_safe_int)
        .ok_or_else(|| Error::bad_request("Invalid module ID."))?;
    let data = db
        .find_by_id::<R::Entity>(id)
        .await?
        .ok_or_else(|| Error::bad_request(format!("{} Not Found.", schema.entity)))?;

    if keep_last {
        let total = db.count(<R::Entity as EntityTrait>::find()).await?;
        if total <= 1 {
            return Err(Error::bad_request(format!(
                "{} must be at least have 1 data.",
                schema.entity
            )));
        }
    }

    remove_row_files(store, schema, &data).await?;
    db.delete_by_id::<R::Entity>(id).await?;
    Ok(data)
}

/// bulk delete by id list (comma-separated string or array).
///
/// every id must be a safe integer (offenders are reported); when the schema
/// scopes bulk operations to one parent, rows spanning several parents are
/// refused; stored files are removed before the rows.
pub async fn bulk_delete<R: Resource>(
    db: &Db,
    store: &impl FileStore,
    body: &Map<String, Value>,
) -> Result<Vec<R::Model>> {
    let schema = R::schema();

    let raw_ids: Vec<String> = match body.get("ids") {
        Some(Value::String(s)) => s
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    };
    if raw_ids.is_empty() {
        return Err(Error::bad_request("Invalid IDs"));
    }

    let invalid: Vec<&str> = raw_ids
        .iter()
        .filter(|s| coerce::parse_safe_int_str(s).is_none())
        .map(String::as_str)
        .collect();
    if !invalid.is_empty() {
        return Err(Error::bad_request(format!(
            "Invalid IDs: {}",
            invalid.join(", ")
        )));
    }
    let ids: Vec<i64> = raw_ids
        .iter()
        .filter_map(|s| coerce::parse_safe_int_str(s))
        .collect();

    let id_col = opsdesk_db::column::<R::Entity>("id")?;
    let rows = db
        .find_all::<R::Entity>(Condition::all().add(id_col.is_in(ids.clone())))
        .await?;
    if rows.is_empty() {
        return Err(Error::bad_request(format!("{} Not Found.", schema.entity)));
    }

    if let Some(scope) = schema.bulk_scope {
        let wire_key = fk_wire_key(scope);
        let mut parents: HashSet<Option<i64>> = HashSet::new();
        for row in &rows {
            let json = serde_json::to_value(row).map_err(Error::internal)?;
            parents.insert(json.get(&wire_key).and_then(Value::as_i64));
        }
        if parents.len() > 1 {
            return Err(Error::bad_request(format!(
                "Bulk delete must target a single {scope}."
            )));
        }
    }

    for row in &rows {
        remove_row_files(store, schema, row).await?;
    }
    db.delete_many::<R::Entity>(Condition::all().add(id_col.is_in(ids)))
        .await?;
    Ok(rows)
}

/// resolve a transition target given either a numeric id or a display name.
pub async fn resolve_parent_ref(
    db: &Db,
    parent: &str,
    label: &str,
    value: &Value,
) -> Result<i64> {
    if let Some(id) = coerce::parse_safe_int(value) {
        if db.parent_exists(parent, id).await? {
            return Ok(id);
        }
        return Err(Error::bad_request(format!("{label} not found: {id}")));
    }
    if let Some(name) = value.as_str() {
        if let Some(id) = db.parent_id_by_name(parent, name).await? {
            return Ok(id);
        }
        return Err(Error::bad_request(format!("{label} not found: {name}")));
    }
    Err(Error::bad_request(format!("{label} value required.")))
}
