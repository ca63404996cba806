use axum::{debug_handler, response::{Html, IntoResponse, Redirect, Response}};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{include_res, res, session::USER_ID, AppResult};

#[debug_handler]
pub async fn index(session: Session) -> AppResult<Response> {
    if session.get::<Uuid>(USER_ID).await?.is_some() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    Ok(Html(res::layout(None, "Welcome", include_res!(str, "/pages/landing.html"))).into_response())
}
