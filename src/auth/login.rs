use std::sync::Arc;

use axum::{
    debug_handler,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    config::Config,
    db::Role,
    include_res,
    profiles::store,
    res,
    session::USER_ID,
    AppError, AppResult, AppState,
};

#[derive(Deserialize)]
pub(crate) struct LoginQuery {
    pub(crate) return_url: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct DevLoginForm {
    email: String,
    return_url: Option<String>,
}

#[debug_handler(state = AppState)]
pub async fn login_page(
    Query(LoginQuery { return_url }): Query<LoginQuery>,
    State(config): State<Arc<Config>>,
    session: Session,
) -> AppResult<Response> {
    if session.get::<Uuid>(USER_ID).await?.is_some() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let return_url = res::safe_return_url(return_url.as_deref(), "/dashboard");
    let dev_form = if config.allow_dev_login {
        include_res!(str, "/pages/dev_login.html").replace("{return_url}", &res::escape(return_url))
    } else {
        String::new()
    };

    Ok(Html(res::layout(
        None,
        "Sign in",
        &include_res!(str, "/pages/login.html").replace("{dev_form}", &dev_form),
    ))
    .into_response())
}

#[debug_handler(state = AppState)]
pub async fn dev_login(
    State(config): State<Arc<Config>>,
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(DevLoginForm { email, return_url }): Form<DevLoginForm>,
) -> AppResult<Response> {
    if !config.allow_dev_login {
        return Ok((StatusCode::FORBIDDEN, "Dev login disabled").into_response());
    }

    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Rejected("A valid email is required".to_owned()));
    }

    let profile = match store::find_profile_by_email(&db_pool, &email).await? {
        Some(profile) => profile,
        None => {
            let profile = store::create_profile(&db_pool, &email, None, Role::Volunteer).await?;
            tracing::info!(profile_id = %profile.id, "created profile on first sign-in");
            profile
        }
    };

    session.cycle_id().await?;
    session.insert(USER_ID, profile.id).await?;
    tracing::info!(profile_id = %profile.id, "signed in");

    let return_url = res::safe_return_url(return_url.as_deref(), "/dashboard");
    Ok(Redirect::to(return_url).into_response())
}
