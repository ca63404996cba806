use axum::{debug_handler, extract::{Path, State}, response::{Html, IntoResponse, Response}};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{auth::Viewer, db::EventWithOrganiser, include_res, reports, res, AppError, AppResult, AppState};

#[debug_handler(state = AppState)]
pub(crate) async fn event(
    viewer: Viewer,
    Path(id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Response> {
    let Some(EventWithOrganiser { event, organiser }) = super::store::find_event(&db_pool, id).await? else {
        return Err(AppError::NotFound("event"));
    };
    let linked = reports::store::list_for_event(&db_pool, event.id).await?;

    Ok(Html(res::layout(
        Some(&viewer),
        &event.title,
        &include_res!(str, "/pages/events/detail.html")
            .replace("{title}", &res::escape(&event.title))
            .replace("{organiser}", &res::escape(organiser.label()))
            .replace("{center_name}", &res::escape(&event.center_name))
            .replace("{location}", &res::escape(&event.location))
            .replace("{scheduled_date}", &res::datetime(event.scheduled_date))
            .replace(
                "{duration}",
                &event.duration_hours.map(|hours| format!("{hours} hours")).unwrap_or_default(),
            )
            .replace("{activity_type}", &res::escape(event.activity_type.as_deref().unwrap_or("")))
            .replace("{description}", &res::escape(event.description.as_deref().unwrap_or("")))
            .replace("{report_count}", &linked.len().to_string())
            .replace("{report_cards}", &reports::render_cards(&linked, "No visit reports for this event yet")),
    ))
    .into_response())
}
