use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors for catalog operations.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Product not found: {id}")]
    ProductNotFound { id: Uuid },

    #[error("{message}")]
    Validation { message: String },

    #[error("Media store failure: {message}")]
    MediaStore { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn product_not_found(id: Uuid) -> Self {
        Self::ProductNotFound { id }
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
