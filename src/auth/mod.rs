use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post},
    Router,
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    db::{Profile, Role},
    profiles::store,
    session::USER_ID,
    AppError, AppState,
};

mod login;
mod logout;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login::login_page))
        .route("/login/dev", post(login::dev_login))
        .route("/logout", get(logout::logout))
}

/// The signed-in identity making the current request.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
}

impl Viewer {
    pub fn is_admin(&self) -> bool {
        crate::access::is_admin(self)
    }

    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.email)
    }
}

impl From<Profile> for Viewer {
    fn from(profile: Profile) -> Self {
        Viewer {
            id: profile.id,
            email: profile.email,
            full_name: profile.full_name,
            role: profile.role,
        }
    }
}

impl FromRequestParts<AppState> for Viewer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let return_url = parts
            .uri
            .path_and_query()
            .map_or(parts.uri.path(), |path_and_query| path_and_query.as_str())
            .to_owned();
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::from(msg))?;

        let Some(user_id) = session.get::<Uuid>(USER_ID).await? else {
            return Err(AppError::Unauthenticated { return_url });
        };

        match store::find_profile(&state.db_pool, user_id).await? {
            Some(profile) => Ok(profile.into()),
            None => {
                tracing::warn!(%user_id, "session points at a missing profile");
                session.flush().await?;
                Err(AppError::Unauthenticated { return_url })
            }
        }
    }
}
