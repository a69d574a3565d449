use thiserror::Error;
use uuid::Uuid;

/// Errors that are safe to expose to other crates consuming accounts.
#[derive(Error, Debug, Clone)]
pub enum AccountsError {
    #[error("Account not found: {id}")]
    NotFound { id: Uuid },

    #[error("Email already exists")]
    Conflict { email: String },

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("{message}")]
    Validation { message: String },

    #[error("Internal error")]
    Internal,
}
