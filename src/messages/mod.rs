mod detail;
mod list;
mod new;
mod read;
pub mod store;

use axum::{routing::{get, post}, Router};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{access, auth::Viewer, db::MessageListing, AppError, AppResult, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::messages))
        .route("/new", get(new::new_message_page).post(new::new_message))
        .route("/{id}", get(detail::message))
        .route("/{id}/read", post(read::mark_read))
}

/// Loads a message for `viewer`, telling a missing id apart from one they may not read.
async fn load_visible(db_pool: &SqlitePool, id: Uuid, viewer: &Viewer) -> AppResult<MessageListing> {
    match store::find_visible(db_pool, id, viewer.id).await? {
        Some(listing) if access::can_view_message(viewer, &listing.message) => Ok(listing),
        Some(_) => Err(deny(id, viewer)),
        None if store::exists(db_pool, id).await? => Err(deny(id, viewer)),
        None => Err(AppError::NotFound("message")),
    }
}

fn deny(id: Uuid, viewer: &Viewer) -> AppError {
    tracing::warn!(message_id = %id, viewer_id = %viewer.id, "message access denied");
    AppError::forbidden("/dashboard/messages")
}
