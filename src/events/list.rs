use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Response}};
use sqlx::SqlitePool;

use crate::{auth::Viewer, db, include_res, res, AppResult, AppState};

use super::{render_cards, store};

#[debug_handler(state = AppState)]
pub(crate) async fn events(
    viewer: Viewer,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Response> {
    let now = db::now();
    let upcoming = store::list_upcoming(&db_pool, now, None).await?;
    let past = store::list_past(&db_pool, now).await?;

    Ok(Html(res::layout(
        Some(&viewer),
        "Events",
        &include_res!(str, "/pages/events/list.html")
            .replace("{upcoming_count}", &upcoming.len().to_string())
            .replace("{upcoming_cards}", &render_cards(&upcoming, "No upcoming events"))
            .replace("{past_count}", &past.len().to_string())
            .replace("{past_cards}", &render_cards(&past, "No past events")),
    ))
    .into_response())
}
