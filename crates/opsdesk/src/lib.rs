//! opsdesk - http server and application setup.
//!
//! this crate wires the generic CRUD engine to the wire:
//! - [`handlers`]: per-entity routers built from the generic CRUD handlers
//! - [`middleware`]: bearer authentication and the privilege decision
//! - [`resources`]: the entity roster binding schemas to sea-orm entities
//! - [`cli`]: command-line interface (serve, migrate, seed)

#![warn(missing_docs)]

/// command-line interface implementation.
pub mod cli;
mod error;
mod extract;
/// http request handlers for the opsdesk api.
pub mod handlers;
mod mailer;
/// authentication middleware and authorization helpers.
pub mod middleware;
mod rate_limit;
/// the entity roster seen by the generic engine.
pub mod resources;
/// idempotent provisioning of roles, features, privileges and reference data.
pub mod seed;
mod storage;

pub use error::ApiError;
pub use mailer::{LogMailer, Mailer};
pub use rate_limit::RateLimiter;
pub use storage::DiskStore;

use std::sync::Arc;
use std::time::Duration;

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;

use opsdesk_db::Db;
use opsdesk_types::Config;

use handlers::crud;
use resources::{
    Clients, Currencies, Phases, Priorities, Roles, Schedules, Stages, TaskHistories,
    TransactionHistories,
};

/// shared application state, constructed once at startup and cloned into
/// every handler.
#[derive(Clone)]
pub struct AppState {
    /// persistence gateway handle.
    pub db: Db,
    /// server configuration.
    pub config: Arc<Config>,
    /// uploaded-file storage.
    pub store: DiskStore,
    /// sliding-window limiter for the sensitive auth endpoints.
    pub limiter: RateLimiter,
    /// outbound-mail collaborator.
    pub mailer: Arc<dyn Mailer>,
}

/// create the axum application with all routes and the default mailer.
pub fn create_app(db: Db, config: Config) -> Router {
    create_app_with(db, config, Arc::new(LogMailer))
}

/// create the axum application with an injected mailer.
pub fn create_app_with(db: Db, config: Config, mailer: Arc<dyn Mailer>) -> Router {
    let store = DiskStore::new(&config.uploads.dir);
    let limiter = RateLimiter::new(Duration::from_secs(config.login_rate.window_secs), 4096);
    let state = AppState {
        db,
        config: Arc::new(config),
        store,
        limiter,
        mailer,
    };

    let protected = Router::new()
        .nest("/roles", crud::routes::<Roles>())
        .nest("/features", handlers::features::routes())
        .nest("/privileges", handlers::privileges::routes())
        .nest("/users", handlers::users::routes())
        .nest("/dashboard", handlers::dashboard::routes())
        .nest("/priorities", crud::routes::<Priorities>())
        .nest("/phases", crud::routes::<Phases>())
        .nest("/tasks", handlers::tasks::routes())
        .nest("/taskhistories", crud::read_only_routes::<TaskHistories>())
        .nest("/events", handlers::events::routes())
        .nest("/schedules", crud::routes::<Schedules>())
        .nest("/clients", crud::routes::<Clients>())
        .nest("/stages", crud::routes::<Stages>())
        .nest("/currencies", crud::routes::<Currencies>())
        .nest("/transactions", handlers::transactions::routes())
        .nest(
            "/transactionhistories",
            crud::read_only_routes::<TransactionHistories>(),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::require_access,
        ));

    Router::new()
        .nest("/api/auth", handlers::auth::routes())
        .nest("/api", protected)
        .route("/health", get(health))
        .fallback(fallback)
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn fallback() -> ApiError {
    ApiError(opsdesk_types::Error::not_found("No API routes detected"))
}
