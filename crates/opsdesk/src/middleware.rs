//! bearer authentication and the per-request authorization decision.
//!
//! the state machine per request: extract bearer token → revocation-list
//! check → signature/expiry verification → principal and role resolution →
//! privilege decision for (role, feature, HTTP verb). public namespaces
//! skip only the final privilege step; the principal is still attached.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use opsdesk_auth::decision::{self, PrivilegeRow};
use opsdesk_auth::token::Claims;
use opsdesk_db::entity::users;
use opsdesk_types::{Error, Principal};

use crate::AppState;
use crate::error::ApiError;

/// authenticate the request: bearer extraction, revocation check, token
/// verification and principal resolution.
///
/// returns the resolved user, the raw authorization header (the revocation
/// list stores the full header value) and the verified claims.
pub async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<(users::Model, String, Claims), Error> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| Error::unauthorized("Access Denied"))?
        .to_string();

    if state.db.is_token_revoked(&header).await? {
        return Err(Error::unauthorized("Token revoked"));
    }

    let token = header
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| Error::unauthorized("Access Denied"))?;
    let claims = opsdesk_auth::verify_token(token, &state.config.auth)?;

    let user = state
        .db
        .user_by_id(claims.id)
        .await?
        .ok_or_else(|| Error::unauthorized("Unauthorized"))?;

    Ok((user, header, claims))
}

/// the stricter administrative check used by delete gating: an independent
/// token verification plus the role-name allow-list.
pub async fn is_admin(state: &AppState, headers: &HeaderMap) -> Result<bool, Error> {
    let (user, _, _) = authenticate(state, headers).await?;
    let role = state
        .db
        .role_by_id(user.role_id)
        .await?
        .ok_or_else(|| Error::unauthorized("User role not found"))?;
    Ok(decision::is_admin_role(
        &role.name,
        &state.config.auth.admin_roles,
    ))
}

/// the feature namespace a request path addresses ("/roles/3" → "roles").
fn feature_of(path: &str) -> String {
    path.trim_start_matches('/')
        .strip_prefix("api/")
        .unwrap_or(path.trim_start_matches('/'))
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// axum middleware guarding the protected routers.
pub async fn require_access(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (user, _, _) = authenticate(&state, req.headers()).await?;
    let role = state
        .db
        .role_by_id(user.role_id)
        .await?
        .ok_or_else(|| Error::unauthorized("User role not found"))?;

    let feature = feature_of(req.uri().path());
    if !decision::is_public_feature(&feature) {
        let privileges: Vec<PrivilegeRow> = state
            .db
            .role_privileges(role.id)
            .await?
            .into_iter()
            .filter_map(|(privilege, feature)| {
                feature.map(|f| PrivilegeRow {
                    feature: f.name,
                    can_create: privilege.privilege_create,
                    can_read: privilege.privilege_read,
                    can_update: privilege.privilege_update,
                    can_delete: privilege.privilege_delete,
                })
            })
            .collect();

        let allowed = decision::required_flag(req.method().as_str())
            .is_some_and(|flag| decision::allows(&privileges, &feature, flag));
        if !allowed {
            return Err(Error::forbidden(
                "You do not have permission to access this resource",
            )
            .into());
        }
    }

    req.extensions_mut().insert(Principal {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role_id: user.role_id,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_of_strips_prefix_and_ids() {
        assert_eq!(feature_of("/roles"), "roles");
        assert_eq!(feature_of("/roles/3"), "roles");
        assert_eq!(feature_of("/api/tasks/phase"), "tasks");
        assert_eq!(feature_of("/"), "");
    }
}
