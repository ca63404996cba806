use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Response}};
use sqlx::SqlitePool;

use crate::{access::ReportScope, auth::Viewer, include_res, res, AppResult, AppState};

use super::{render_cards, store};

#[debug_handler(state = AppState)]
pub(crate) async fn reports(
    viewer: Viewer,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Response> {
    let mine = store::list_by_volunteer(&db_pool, viewer.id).await?;
    let scope = ReportScope::for_viewer(&viewer);
    let scoped = store::list_scoped(&db_pool, viewer.id, scope).await?;

    // volunteers only see the second section when someone else has reported
    let scoped_section = if scope == ReportScope::All || !scoped.is_empty() {
        include_res!(str, "/pages/reports/section.html")
            .replace("{heading}", scope.heading())
            .replace("{count}", &scoped.len().to_string())
            .replace("{cards}", &render_cards(&scoped, "No reports yet"))
    } else {
        String::new()
    };

    Ok(Html(res::layout(
        Some(&viewer),
        "Visit reports",
        &include_res!(str, "/pages/reports/list.html")
            .replace("{my_count}", &mine.len().to_string())
            .replace("{my_cards}", &render_cards(&mine, "You have not submitted any reports yet"))
            .replace("{scoped_section}", &scoped_section),
    ))
    .into_response())
}
