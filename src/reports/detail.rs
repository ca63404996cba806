use axum::{debug_handler, extract::{Path, State}, response::{Html, IntoResponse, Response}};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{access, auth::Viewer, db::ReportWithAuthor, include_res, res, AppError, AppResult, AppState};

#[debug_handler(state = AppState)]
pub(crate) async fn report(
    viewer: Viewer,
    Path(id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Response> {
    let Some(ReportWithAuthor { report, author }) = super::store::find_report(&db_pool, id).await? else {
        return Err(AppError::NotFound("report"));
    };
    if !access::can_view_report(&viewer, &report) {
        return Err(AppError::forbidden("/dashboard/reports"));
    }

    let optional = |title: &str, text: &Option<String>| match text {
        Some(text) if !text.trim().is_empty() => include_res!(str, "/pages/reports/extra.html")
            .replace("{title}", title)
            .replace("{text}", &res::escape(text)),
        _ => String::new(),
    };
    let event_link = match report.event_id {
        Some(event_id) => format!(r#"<p><a href="/dashboard/events/{event_id}">Linked event</a></p>"#),
        None => String::new(),
    };

    Ok(Html(res::layout(
        Some(&viewer),
        &report.center_name,
        &include_res!(str, "/pages/reports/detail.html")
            .replace("{center_name}", &res::escape(&report.center_name))
            .replace("{author}", &res::escape(author.label()))
            .replace("{volunteer_id}", &report.volunteer_id.to_string())
            .replace("{email}", &res::escape(&report.email))
            .replace("{visit_date}", &res::date(report.visit_date))
            .replace("{duration_hours}", &report.duration_hours.to_string())
            .replace("{location}", &res::escape(&report.location))
            .replace("{activity_type}", &res::escape(&report.activity_type))
            .replace("{children_count}", &report.children_count.to_string())
            .replace("{children_names}", &res::escape(&report.children_names))
            .replace("{activity_description}", &res::escape(&report.activity_description))
            .replace("{testimonials}", &optional("Testimonials", &report.testimonials))
            .replace("{child_observations}", &optional("Observations on the children's progress", &report.child_observations))
            .replace("{event_link}", &event_link)
            .replace("{created_at}", &res::datetime(report.created_at)),
    ))
    .into_response())
}
