use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors for account operations.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Account not found: {id}")]
    AccountNotFound { id: Uuid },

    #[error("Email already exists")]
    EmailAlreadyExists { email: String },

    /// Deliberately the same message for unknown email and wrong password.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid or expired session")]
    InvalidSession,

    #[error("{message}")]
    Validation { message: String },

    #[error("Media store failure: {message}")]
    MediaStore { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn account_not_found(id: Uuid) -> Self {
        Self::AccountNotFound { id }
    }

    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            email: email.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn media_store(message: impl Into<String>) -> Self {
        Self::MediaStore {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
