//! signed token issuance and verification.
//!
//! two lifetimes exist: full-session tokens (7 days) and short action tokens
//! (15 minutes) used for password-reset links. verification distinguishes
//! expired from malformed from any other failure, because the wire messages
//! differ.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use opsdesk_types::AuthConfig;

use crate::AuthError;

/// claims embedded in every token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// user id.
    pub id: i64,
    /// e-mail address.
    pub email: String,
    /// display name.
    pub name: String,
    /// phone number.
    pub phone: String,
    /// stored path of the profile photo, empty when unset.
    pub photo: String,
    /// issued-at (unix timestamp).
    pub iat: i64,
    /// expiration (unix timestamp).
    pub exp: i64,
}

/// the identity a token is issued for.
#[derive(Debug, Clone)]
pub struct TokenSubject {
    /// user id.
    pub id: i64,
    /// e-mail address.
    pub email: String,
    /// display name.
    pub name: String,
    /// phone number.
    pub phone: String,
    /// stored path of the profile photo, empty when unset.
    pub photo: String,
}

fn issue(subject: &TokenSubject, lifetime_secs: i64, config: &AuthConfig) -> crate::Result<String> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        id: subject.id,
        email: subject.email.clone(),
        name: subject.name.clone(),
        phone: subject.phone.clone(),
        photo: subject.photo.clone(),
        iat: now,
        exp: now + lifetime_secs,
    };
    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("token encode: {e}")))
}

/// issue a full-session token.
pub fn issue_token(subject: &TokenSubject, config: &AuthConfig) -> crate::Result<String> {
    issue(subject, config.session_token_secs, config)
}

/// issue a short-lived action token (password-reset links).
pub fn issue_short_token(subject: &TokenSubject, config: &AuthConfig) -> crate::Result<String> {
    issue(subject, config.short_token_secs, config)
}

/// decode and verify a token, returning its claims.
pub fn verify_token(token: &str, config: &AuthConfig) -> crate::Result<Claims> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);
    jsonwebtoken::decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            jsonwebtoken::errors::ErrorKind::InvalidToken => AuthError::TokenMalformed,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> TokenSubject {
        TokenSubject {
            id: 7,
            email: "ops@example.com".to_string(),
            name: "Ops".to_string(),
            phone: "+1000000".to_string(),
            photo: String::new(),
        }
    }

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn issue_and_verify_round_trips_claims() {
        let cfg = config();
        let token = issue_token(&subject(), &cfg).unwrap();
        let claims = verify_token(&token, &cfg).unwrap();
        assert_eq!(claims.id, 7);
        assert_eq!(claims.email, "ops@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn short_token_expires_sooner_than_session_token() {
        let cfg = config();
        let session = verify_token(&issue_token(&subject(), &cfg).unwrap(), &cfg).unwrap();
        let short = verify_token(&issue_short_token(&subject(), &cfg).unwrap(), &cfg).unwrap();
        assert!(short.exp < session.exp);
    }

    #[test]
    fn garbage_is_malformed() {
        let err = verify_token("not-a-token", &config()).unwrap_err();
        assert!(matches!(err, AuthError::TokenMalformed));
    }

    #[test]
    fn wrong_secret_is_not_reported_as_expired() {
        let token = issue_token(&subject(), &config()).unwrap();
        let other = AuthConfig {
            jwt_secret: "different".to_string(),
            ..AuthConfig::default()
        };
        let err = verify_token(&token, &other).unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid(_)));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let cfg = AuthConfig {
            jwt_secret: "test-secret".to_string(),
            session_token_secs: -120,
            ..AuthConfig::default()
        };
        let token = issue_token(&subject(), &cfg).unwrap();
        let err = verify_token(&token, &cfg).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }
}
