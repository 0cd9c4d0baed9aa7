use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::auth::errors::AuthError;
use service::refueling::RefuelingError;
use thiserror::Error;
use tracing::error;

/// JSON error body: `{"error": title, "detail": ...}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: String,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, title: title.into(), detail }
    }

    pub fn internal(detail: impl ToString) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(detail.to_string()))
    }

    pub fn unauthorized(title: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, title, None)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, title = %self.title, detail = ?self.detail, "request failed");
        }
        let body = match self.detail {
            Some(detail) => serde_json::json!({ "error": self.title, "detail": detail }),
            None => serde_json::json!({ "error": self.title }),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Failures that are not part of the normal request outcomes end up as a 500.
impl From<RefuelingError> for JsonApiError {
    fn from(e: RefuelingError) -> Self {
        match e {
            RefuelingError::NotFound => Self::new(StatusCode::NOT_FOUND, "Resource not found!", None),
            RefuelingError::Invalid(errors) => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation Failed",
                Some(errors.full_messages().join(", ")),
            ),
            RefuelingError::Repository(detail) => Self::internal(detail),
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        let status = match e {
            AuthError::Validation(_) | AuthError::Conflict => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::Unauthorized | AuthError::TokenError(_) => StatusCode::UNAUTHORIZED,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::HashError(_) | AuthError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            Self::internal(e)
        } else {
            Self::new(status, e.to_string(), None)
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("migration failed: {0}")]
    Migration(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
