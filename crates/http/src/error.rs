//! Error responses for the HTTP layer.
//!
//! Bodies are plain text so clients receive the message verbatim.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use uuid::Uuid;

/// Header carrying the identifier logged alongside an error response.
pub const ERROR_ID_HEADER: &str = "x-error-id";

/// Application error types that map to HTTP responses
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AppError {
    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Internal { message: String },
}

impl AppError {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(
                error_id = %error_id,
                status_code = %status.as_u16(),
                %message,
                "Request error"
            );
        } else {
            tracing::debug!(
                error_id = %error_id,
                status_code = %status.as_u16(),
                %message,
                "Request rejected"
            );
        }

        (status, [(ERROR_ID_HEADER, error_id.to_string())], message).into_response()
    }
}
