use axum::{debug_handler, extract::{Path, State}, response::{Html, IntoResponse, Response}};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{auth::Viewer, db::MessageListing, include_res, res, unread, AppResult, AppState};

#[debug_handler(state = AppState)]
pub(crate) async fn message(
    viewer: Viewer,
    Path(id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Response> {
    let MessageListing { message, party } = super::load_visible(&db_pool, id, &viewer).await?;

    let mark_read = if unread::can_mark_as_read(&message, &viewer) {
        include_res!(str, "/pages/messages/mark_read.html").replace("{id}", &message.id.to_string())
    } else {
        String::new()
    };
    let read_footer = match unread::ReadState::of(&message) {
        unread::ReadState::Read(at) => format!(r#"<p class="muted">Read at {}</p>"#, res::datetime(at)),
        unread::ReadState::Unread => String::new(),
    };

    Ok(Html(res::layout(
        Some(&viewer),
        &message.subject,
        &include_res!(str, "/pages/messages/detail.html")
            .replace("{mark_read}", &mark_read)
            .replace("{subject}", &res::escape(&message.subject))
            .replace("{sender}", &res::escape(party.label()))
            .replace("{created_at}", &res::datetime(message.created_at))
            .replace(
                "{broadcast_badge}",
                if message.is_broadcast { r#"<span class="badge">Broadcast message</span>"# } else { "" },
            )
            .replace("{read_footer}", &read_footer)
            .replace("{content}", &res::markdown(&message.content)),
    ))
    .into_response())
}
