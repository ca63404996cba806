use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Response}};
use sqlx::SqlitePool;

use crate::{auth::Viewer, db, events, include_res, messages, reports, res, AppResult, AppState};

const PREVIEW_LIMIT: i64 = 5;

#[debug_handler(state = AppState)]
pub async fn dashboard(
    viewer: Viewer,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Response> {
    let upcoming = events::store::list_upcoming(&db_pool, db::now(), Some(PREVIEW_LIMIT)).await?;
    let recent = reports::store::list_recent(&db_pool, PREVIEW_LIMIT).await?;
    let my_reports = reports::store::count_reports_by(&db_pool, viewer.id).await?;
    let all_reports = reports::store::count_reports(&db_pool).await?;
    let unread = messages::store::count_unread(&db_pool, viewer.id).await?;

    let body = include_res!(str, "/pages/dashboard.html")
        .replace("{name}", &res::escape(viewer.display_name()))
        .replace("{my_reports}", &my_reports.to_string())
        .replace("{all_reports}", &all_reports.to_string())
        .replace("{unread}", &unread.to_string())
        .replace("{upcoming_cards}", &events::render_cards(&upcoming, "No upcoming events"))
        .replace("{recent_cards}", &reports::render_cards(&recent, "No visit reports yet"));

    Ok(Html(res::layout(Some(&viewer), "Dashboard", &body)).into_response())
}
