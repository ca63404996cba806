mod page;
pub mod store;

use axum::{routing::get, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(page::profile))
}
