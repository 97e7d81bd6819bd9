use archsched_core::{ErrorKind, ShareError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{error, info};
use serde_json::json;

/// Errors returned by share handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Body is not JSON or lacks a `tasks` array and numeric `expiryHours`.
    #[error("Invalid request data: {0}")]
    InvalidPayload(String),
    #[error(transparent)]
    Share(#[from] ShareError),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPayload(_) => ErrorKind::Validation,
            Self::Share(err) => err.kind(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Expired => StatusCode::GONE,
            ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::InvalidPayload(_) => "Invalid request data".to_string(),
            Self::Share(ShareError::MissingToken) => "Share ID is required".to_string(),
            Self::Share(err) => match err.kind() {
                ErrorKind::Validation => err.to_string(),
                ErrorKind::NotFound => "Share not found".to_string(),
                ErrorKind::Expired => "Share has expired".to_string(),
                ErrorKind::Storage => "Internal server error".to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "event=http_error module=http status=error status_code={} error_kind={} error={self}",
                status.as_u16(),
                self.kind()
            );
        } else {
            info!(
                "event=http_error module=http status=rejected status_code={} error_kind={}",
                status.as_u16(),
                self.kind()
            );
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
