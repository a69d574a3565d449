use tracing::error;

use catalog::api::rest::error::ApiError;

use crate::domain::error::DomainError;

/// Accounts domain errors render through the same `{success, message}`
/// envelope as the catalog.
impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::AccountNotFound { .. } => {
                ApiError::NotFound("User not found".to_string())
            }
            DomainError::EmailAlreadyExists { .. } => {
                ApiError::Conflict("Email already exists".to_string())
            }
            DomainError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid username or password".to_string())
            }
            DomainError::InvalidSession => {
                ApiError::Unauthorized("Invalid or expired session".to_string())
            }
            DomainError::Validation { message } => ApiError::Validation(message),
            DomainError::MediaStore { message } => ApiError::Upstream(message),
            DomainError::Database { message } => {
                error!(error = %message, "Database failure");
                ApiError::Internal
            }
        }
    }
}
