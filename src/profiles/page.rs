use axum::{debug_handler, extract::{Path, State}, response::{Html, IntoResponse, Response}};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{auth::Viewer, db::Role, include_res, reports, res, AppError, AppResult, AppState};

use super::store;

#[debug_handler(state = AppState)]
pub(crate) async fn profile(
    viewer: Viewer,
    Path(profile_id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Response> {
    let Some(profile) = store::find_profile(&db_pool, profile_id).await? else {
        return Err(AppError::NotFound("profile"));
    };

    let report_count = reports::store::count_reports_by(&db_pool, profile.id).await?;
    let role = match profile.role {
        Role::Admin => "Admin",
        Role::Volunteer => "Volunteer",
    };

    Ok(Html(res::layout(
        Some(&viewer),
        profile.display_name(),
        &include_res!(str, "/pages/profiles/profile.html")
            .replace("{name}", &res::escape(profile.display_name()))
            .replace("{role}", role)
            .replace("{report_count}", &report_count.to_string())
            .replace("{id}", &profile.id.to_string()),
    ))
    .into_response())
}
