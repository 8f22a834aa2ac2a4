use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::state::AppState;

/// Body shown to callers for internal errors in production mode.
pub const GENERIC_ERROR_MESSAGE: &str = "Internal server error";

/// Application-level errors for HTTP handlers
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(#[source] anyhow::Error),

    #[error("Unauthorized - {0}")]
    Unauthorized(String),

    #[error("Forbidden - {0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("File is too large")]
    PayloadTooLarge,

    #[error("Internal error: {0}")]
    InternalError(#[source] anyhow::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Detail attached to internal-error responses so the outer translation
/// layer can log the full chain and redact the caller-facing message.
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    /// Root error message, shown verbatim outside production.
    pub message: String,
    /// Full error chain for server-side logging.
    pub full: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            AppError::InternalError(err) => {
                let detail = ErrorDetail {
                    message: err.to_string(),
                    full: format!("{err:?}"),
                };
                let mut response =
                    (status, Json(json!({ "message": detail.message }))).into_response();
                response.extensions_mut().insert(detail);
                response
            }
            other => (status, Json(json!({ "message": other.to_string() }))).into_response(),
        }
    }
}

/// Last-resort translation layer for errors forwarded out of handlers.
///
/// Internal errors are logged here with their full chain; in production the
/// caller only ever sees the fixed generic message.
pub async fn translate_errors(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    let Some(detail) = response.extensions().get::<ErrorDetail>().cloned() else {
        return response;
    };

    tracing::error!(detail = %detail.full, "Unhandled request error");

    let message = if state.env.is_production() {
        GENERIC_ERROR_MESSAGE
    } else {
        detail.message.as_str()
    };
    (response.status(), Json(json!({ "message": message }))).into_response()
}

// Implement From for common error types to allow automatic conversion
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl From<crate::upload::StageError> for AppError {
    fn from(err: crate::upload::StageError) -> Self {
        match err {
            crate::upload::StageError::TooLarge => AppError::PayloadTooLarge,
            crate::upload::StageError::Io(err) => AppError::InternalError(anyhow::Error::new(err)),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::BadRequest(anyhow::Error::new(err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err)
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
