//! configuration types for opsdesk.

use serde::{Deserialize, Serialize};

/// main configuration for the opsdesk server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// address to bind the http server to.
    pub listen_addr: String,

    /// origin used when building links handed to the mailer.
    pub client_origin: String,

    /// database configuration.
    pub database: DatabaseConfig,

    /// token and password configuration.
    pub auth: AuthConfig,

    /// uploaded-file storage configuration.
    pub uploads: UploadConfig,

    /// sliding-window rate limit applied to login/forgot-password.
    pub login_rate: RateConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            client_origin: "http://localhost:4000".to_string(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            uploads: UploadConfig::default(),
            login_rate: RateConfig::default(),
        }
    }
}

/// database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// connection string; sqlite path or postgres url.
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://opsdesk.db?mode=rwc".to_string(),
        }
    }
}

/// token and password configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for token signing. override via OPSDESK_JWT_SECRET.
    pub jwt_secret: String,

    /// full-session token lifetime in seconds (7 days).
    pub session_token_secs: i64,

    /// short action-token lifetime in seconds (15 minutes).
    pub short_token_secs: i64,

    /// role names granted the administrative override.
    pub admin_roles: Vec<String>,

    /// role id assigned to self-registered users.
    pub default_member_role: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me".to_string(),
            session_token_secs: 7 * 24 * 60 * 60,
            short_token_secs: 15 * 60,
            admin_roles: vec!["Super Admin".to_string(), "Admin".to_string()],
            default_member_role: 3,
        }
    }
}

/// uploaded-file storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// root directory for stored uploads.
    pub dir: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: "public".to_string(),
        }
    }
}

/// sliding-window rate limit parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateConfig {
    /// window length in seconds.
    pub window_secs: u64,
    /// requests allowed per key inside one window.
    pub max_requests: u32,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            window_secs: 15 * 60,
            max_requests: 10,
        }
    }
}

impl Config {
    /// apply environment overrides for secrets and endpoints.
    ///
    /// OPSDESK_JWT_SECRET, OPSDESK_DATABASE_URL, OPSDESK_LISTEN_ADDR and
    /// OPSDESK_UPLOAD_DIR take precedence over file/default values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(secret) = std::env::var("OPSDESK_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Ok(url) = std::env::var("OPSDESK_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(addr) = std::env::var("OPSDESK_LISTEN_ADDR") {
            self.listen_addr = addr;
        }
        if let Ok(dir) = std::env::var("OPSDESK_UPLOAD_DIR") {
            self.uploads.dir = dir;
        }
        self
    }
}
