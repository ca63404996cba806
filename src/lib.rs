pub mod access;
pub mod appresult;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod events;
pub mod index;
pub mod messages;
pub mod profiles;
pub mod reports;
pub mod res;
pub mod session;
pub mod unread;

use std::sync::Arc;

use axum::{extract::FromRef, routing::get, Router};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub use appresult::{AppError, AppResult};
pub use config::Config;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, config: Config) -> Self {
        AppState {
            db_pool,
            config: Arc::new(config),
        }
    }
}

/// The whole site, with sessions and request tracing applied.
pub fn app(state: AppState) -> Router {
    let session_layer = session::layer(&state.config);

    Router::new()
        .route("/", get(index::index))
        .route("/dashboard", get(dashboard::dashboard))
        .merge(auth::router())
        .nest("/dashboard/messages", messages::router())
        .nest("/dashboard/reports", reports::router())
        .nest("/dashboard/events", events::router())
        .nest("/dashboard/profiles", profiles::router())
        .with_state(state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
}
