use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::error;

use crate::api::rest::dto::MessageResponse;
use crate::domain::error::DomainError;

/// REST-facing error. Every variant renders as the `{success: false,
/// message}` envelope with a single-line message; internal detail stays in
/// the log.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    Upstream(String),
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Upstream(_) | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Validation(m)
            | Self::NotFound(m)
            | Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::Conflict(m)
            | Self::Upstream(m) => m.clone(),
            Self::Internal => "Something went wrong".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(MessageResponse {
                success: false,
                message: self.message(),
            }),
        )
            .into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::ProductNotFound { .. } => Self::NotFound("Product not found".to_string()),
            DomainError::Validation { message } => Self::Validation(message),
            DomainError::MediaStore { message } => Self::Upstream(message),
            DomainError::Database { message } => {
                error!(error = %message, "Database failure");
                Self::Internal
            }
        }
    }
}
