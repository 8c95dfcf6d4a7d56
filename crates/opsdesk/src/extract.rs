//! request-body normalization.
//!
//! write endpoints accept either a JSON object or a multipart form; both
//! collapse to the same shape the engine consumes: a string-keyed value map
//! plus the set of stored uploads. file parts are persisted immediately
//! (the pipeline deletes them again on any failure) and parts that do not
//! match a declared file field are drained and dropped.

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use serde_json::{Map, Value};

use opsdesk_engine::UploadedFiles;
use opsdesk_types::{EntitySchema, Error};

use crate::AppState;
use crate::error::ApiError;

const BODY_LIMIT: usize = 10 * 1024 * 1024;

/// normalize a write-request body.
pub async fn read_body(
    state: &AppState,
    schema: &EntitySchema,
    req: Request,
) -> Result<(Map<String, Value>, UploadedFiles), ApiError> {
    let is_multipart = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    if is_multipart {
        read_multipart(state, schema, req).await
    } else {
        read_json(req).await
    }
}

async fn read_json(req: Request) -> Result<(Map<String, Value>, UploadedFiles), ApiError> {
    let bytes = axum::body::to_bytes(req.into_body(), BODY_LIMIT)
        .await
        .map_err(|_| Error::bad_request("Invalid request body."))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok((Map::new(), UploadedFiles::default()));
    }
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|_| Error::bad_request("Invalid JSON body."))?;
    let body = value
        .as_object()
        .cloned()
        .ok_or_else(|| Error::bad_request("Invalid JSON body."))?;
    Ok((body, UploadedFiles::default()))
}

async fn read_multipart(
    state: &AppState,
    schema: &EntitySchema,
    req: Request,
) -> Result<(Map<String, Value>, UploadedFiles), ApiError> {
    let mut multipart = Multipart::from_request(req, &())
        .await
        .map_err(|_| Error::bad_request("Invalid multipart body."))?;

    let mut body = Map::new();
    let mut uploads = UploadedFiles::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| Error::bad_request("Invalid multipart body."))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);

        match filename {
            Some(original) if !original.is_empty() => {
                let declared = schema.field(&name).and_then(|f| f.file);
                if let Some(kind) = declared {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|_| Error::bad_request("Invalid multipart body."))?;
                    let path = state
                        .store
                        .save(schema.entity, kind, &original, &bytes)
                        .await
                        .map_err(Error::internal)?;
                    uploads.push(name, path);
                } else {
                    // not a declared file field: drain and discard
                    let _ = field.bytes().await;
                }
            }
            _ => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| Error::bad_request("Invalid multipart body."))?;
                body.insert(name, Value::String(text));
            }
        }
    }

    Ok((body, uploads))
}
