//! authentication flows: register, login, token refresh/revocation and the
//! password lifecycle.
//!
//! login and the forgot-password mail are gated by the sliding-window rate
//! limiter; every token-revoking flow inserts the presented authorization
//! header into the blacklist before answering with a fresh token.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::{IntoActiveModel, Set};
use serde_json::{Map, Value, json};

use opsdesk_auth::token::TokenSubject;
use opsdesk_auth::{hash_password, issue_short_token, issue_token, verify_password};
use opsdesk_db::entity::users;
use opsdesk_engine::{Resource, list, pipeline};
use opsdesk_types::Error;

use crate::AppState;
use crate::error::ApiError;
use crate::extract::read_body;
use crate::middleware::authenticate;
use crate::resources::Users;

fn subject(user: &users::Model) -> TokenSubject {
    TokenSubject {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        phone: user.phone.clone(),
        photo: user.photo.clone().unwrap_or_default(),
    }
}

fn payload(user: &users::Model) -> Value {
    json!({
        "id": user.id,
        "email": user.email,
        "name": user.name,
        "phone": user.phone,
        "photo": user.photo.clone().unwrap_or_default(),
    })
}

fn with_token(user: &users::Model, token: String) -> Value {
    let mut body = payload(user);
    body["token"] = Value::String(token);
    body
}

fn require_fields(body: &Map<String, Value>, fields: &[&str]) -> Result<(), Error> {
    let missing: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|f| match body.get(*f) {
            None => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        })
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::bad_request(format!("{} required", missing.join(", "))))
    }
}

fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "local".to_string())
}

fn check_rate(state: &AppState, headers: &HeaderMap) -> Result<(), Error> {
    if state.limiter.allow(
        &client_key(headers),
        state.config.login_rate.max_requests,
    ) {
        Ok(())
    } else {
        Err(Error::TooManyRequests(
            "Too many requests, please try again later.".to_string(),
        ))
    }
}

async fn set_password(state: &AppState, user: &users::Model, password: &str) -> Result<(), Error> {
    let mut model = user.clone().into_active_model();
    model.password = Set(hash_password(password)?);
    model.updated_at = Set(Utc::now());
    state.db.update(model).await?;
    Ok(())
}

/// POST /register - public self-registration into the default member role.
pub async fn register(
    State(state): State<AppState>,
    req: Request,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (mut body, uploads) = read_body(&state, Users::schema(), req).await?;
    body.insert(
        "role".to_string(),
        json!(state.config.auth.default_member_role),
    );
    let model = pipeline::create::<Users>(&state.db, &state.store, &body, &uploads).await?;
    Ok((
        StatusCode::CREATED,
        Json(list::model_to_wire::<Users>(&model)?),
    ))
}

/// POST /login - credentials in, 7-day token out. rate limited.
pub async fn login(
    State(state): State<AppState>,
    req: Request,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    check_rate(&state, req.headers())?;
    let (body, _) = read_body(&state, Users::schema(), req).await?;
    require_fields(&body, &["email", "password"])?;

    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let user = state
        .db
        .user_by_email(email)
        .await?
        .ok_or_else(|| Error::unauthorized("Invalid email or password."))?;
    if !verify_password(password, &user.password)? {
        return Err(Error::unauthorized("Invalid email or password.").into());
    }

    let token = issue_token(&subject(&user), &state.config.auth)?;
    Ok((StatusCode::CREATED, Json(with_token(&user, token))))
}

/// GET / - the authenticated user with role and privileges attached.
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let (user, _, _) = authenticate(&state, &headers).await?;
    let role = state.db.role_by_id(user.role_id).await?;

    let mut body = list::shape_row(
        Users::schema(),
        serde_json::to_value(&user).map_err(Error::internal)?,
    );
    if let Some(role) = role {
        let mut role_json = serde_json::to_value(&role).map_err(Error::internal)?;
        let privileges: Vec<Value> = state
            .db
            .role_privileges(role.id)
            .await?
            .into_iter()
            .map(|(privilege, feature)| {
                let mut row = serde_json::to_value(&privilege).unwrap_or(Value::Null);
                if let Some(obj) = row.as_object_mut() {
                    obj.insert(
                        "feature".to_string(),
                        feature
                            .and_then(|f| serde_json::to_value(&f).ok())
                            .unwrap_or(Value::Null),
                    );
                }
                row
            })
            .collect();
        role_json["privileges"] = Value::Array(privileges);
        body["role"] = role_json;
    }
    Ok(Json(body))
}

/// GET /refresh - revoke the presented token and issue a fresh one.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (user, header, _) = authenticate(&state, &headers).await?;
    state.db.revoke_token(&header).await?;
    let token = issue_token(&subject(&user), &state.config.auth)?;
    Ok((StatusCode::CREATED, Json(with_token(&user, token))))
}

/// GET /logout - revoke the presented token.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let (user, header, _) = authenticate(&state, &headers).await?;
    state.db.revoke_token(&header).await?;
    let mut body = payload(&user);
    body["message"] = Value::String("logout successful".to_string());
    Ok(Json(body))
}

/// PATCH /password/update - verify the old password, store the new hash,
/// revoke the token and answer with a fresh one.
pub async fn update_password(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<Value>, ApiError> {
    let headers = req.headers().clone();
    let (body, _) = read_body(&state, Users::schema(), req).await?;
    require_fields(&body, &["oldPassword", "password"])?;

    let (user, header, _) = authenticate(&state, &headers).await?;
    let old = body["oldPassword"].as_str().unwrap_or_default();
    if !verify_password(old, &user.password)? {
        return Err(Error::unauthorized("Invalid old password").into());
    }

    set_password(&state, &user, body["password"].as_str().unwrap_or_default()).await?;
    state.db.revoke_token(&header).await?;
    let token = issue_token(&subject(&user), &state.config.auth)?;
    Ok(Json(with_token(&user, token)))
}

/// PATCH /password/forgot - authenticated by the short reset token.
pub async fn forgot_password(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<Value>, ApiError> {
    let headers = req.headers().clone();
    let (body, _) = read_body(&state, Users::schema(), req).await?;
    require_fields(&body, &["password"])?;

    let (user, header, _) = authenticate(&state, &headers).await?;
    set_password(&state, &user, body["password"].as_str().unwrap_or_default()).await?;
    state.db.revoke_token(&header).await?;
    let token = issue_token(&subject(&user), &state.config.auth)?;
    Ok(Json(with_token(&user, token)))
}

/// POST /password/verify - issue a 15-minute reset link for a known e-mail
/// and hand it to the mailer. rate limited.
pub async fn send_forgot(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<Value>, ApiError> {
    check_rate(&state, req.headers())?;
    let (body, _) = read_body(&state, Users::schema(), req).await?;
    require_fields(&body, &["email"])?;

    let email = body["email"].as_str().unwrap_or_default();
    let user = state
        .db
        .user_by_email(email)
        .await?
        .ok_or_else(|| Error::not_found("User not found"))?;

    let token = issue_short_token(&subject(&user), &state.config.auth)?;
    let link = format!("{}/forgot-password/{}", state.config.client_origin, token);
    state.mailer.send_reset(&user.email, &user.name, &link);

    Ok(Json(
        json!({"message": "Reset password email sent successfully"}),
    ))
}

/// the /api/auth router. not behind the privilege middleware; each flow
/// authenticates itself where needed.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/password/verify", post(send_forgot))
        .route("/password/forgot", patch(forgot_password))
        .route("/password/update", patch(update_password))
        .route("/", get(me))
        .route("/refresh", get(refresh))
        .route("/logout", get(logout))
}
