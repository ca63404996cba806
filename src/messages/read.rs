use axum::{debug_handler, extract::{Path, State}, response::{IntoResponse, Redirect, Response}};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{auth::Viewer, db, unread, AppError, AppResult, AppState};

#[debug_handler(state = AppState)]
pub(crate) async fn mark_read(
    viewer: Viewer,
    Path(id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Response> {
    let detail_url = format!("/dashboard/messages/{id}");
    let listing = super::load_visible(&db_pool, id, &viewer).await?;

    let read_at = match unread::mark_as_read(&listing.message, &viewer, db::now()) {
        Ok(read_at) => read_at,
        Err(err) => {
            tracing::warn!(message_id = %id, viewer_id = %viewer.id, %err, "read transition refused");
            return Err(AppError::forbidden(detail_url));
        }
    };

    if !super::store::set_read_at(&db_pool, id, viewer.id, read_at).await? {
        return Err(AppError::NotFound("message"));
    }
    tracing::info!(message_id = %id, viewer_id = %viewer.id, "message marked as read");

    Ok(Redirect::to(&detail_url).into_response())
}
