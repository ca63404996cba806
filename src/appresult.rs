use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::res;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not signed in")]
    Unauthenticated { return_url: String },
    #[error("not allowed here, sending to {redirect}")]
    Forbidden { redirect: String },
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn forbidden(redirect: impl Into<String>) -> Self {
        AppError::Forbidden { redirect: redirect.into() }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthenticated { return_url } => {
                Redirect::to(&format!("/login?return_url={}", urlencoding::encode(&return_url))).into_response()
            }
            AppError::Forbidden { redirect } => Redirect::to(&redirect).into_response(),
            AppError::NotFound(what) => {
                (StatusCode::NOT_FOUND, Html(res::sorry(what))).into_response()
            }
            AppError::Rejected(message) => {
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong. Please try again.",
                )
                    .into_response()
            }
        }
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        Self::Internal(anyhow::Error::msg(err))
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        Self::Internal(anyhow::Error::msg(err.to_owned()))
    }
}

macro_rules! apperr_impl {
    ($E:ty) => {
        impl From<$E> for AppError {
            fn from(err: $E) -> Self {
                Self::Internal(anyhow::Error::from(err))
            }
        }
    };
}

apperr_impl!(sqlx::Error);
apperr_impl!(tower_sessions::session::Error);
