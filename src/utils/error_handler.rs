use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ErrorResponse;

#[derive(Debug)]
pub enum AppError {
    BadRequestErr(String),
    NotFound(String),
    Auth(String),
    Forbidden(String),
    /// server side failure with a message that is safe to show
    ServerErr(String),
    AnyError(anyhow::Error),
}

impl AppError {
    pub fn unknown_error() -> Self {
        Self::AnyError(anyhow::anyhow!("Unknown error"))
    }

    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            Self::BadRequestErr(msg) => {
                tracing::debug!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            Self::NotFound(msg) => {
                tracing::debug!("Not Found: {}", msg);
                (StatusCode::NOT_FOUND, msg)
            }
            Self::Auth(msg) => {
                tracing::debug!("Unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, msg)
            }
            Self::Forbidden(msg) => {
                tracing::debug!("Forbidden: {}", msg);
                (StatusCode::FORBIDDEN, msg)
            }
            Self::ServerErr(msg) => {
                tracing::debug!("Server error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            Self::AnyError(err) => {
                // internal details stay in the logs only
                tracing::error!("Something went wrong: {:?}", err);
                let msg = "Unexpected error".to_owned();
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        }
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        Self::AnyError(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = self.status_and_message();
        let response = ErrorResponse::new(msg);
        (status, Json(response)).into_response()
    }
}
