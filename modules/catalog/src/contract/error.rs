use thiserror::Error;
use uuid::Uuid;

/// Errors that are safe to expose to other crates consuming the catalog.
#[derive(Error, Debug, Clone)]
pub enum CatalogError {
    #[error("Product not found: {id}")]
    NotFound { id: Uuid },

    #[error("{message}")]
    Validation { message: String },

    #[error("Upstream failure: {message}")]
    Upstream { message: String },

    #[error("Internal error")]
    Internal,
}

impl CatalogError {
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }
}
