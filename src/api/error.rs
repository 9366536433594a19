//! Mapping of session errors onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::error::{AppError, SettingsError};

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Lock(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Settings(e) => match e {
                SettingsError::KeyNotFound(_) | SettingsError::FileNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                SettingsError::InvalidValue { .. }
                | SettingsError::InvalidColour(_)
                | SettingsError::Parse(_) => StatusCode::BAD_REQUEST,
                SettingsError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        let missing: AppError = SettingsError::KeyNotFound("x".into()).into();
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        let invalid: AppError = SettingsError::invalid("x", "bad").into();
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Lock("engine".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
